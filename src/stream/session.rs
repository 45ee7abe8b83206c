//! Turn session plumbing.
//!
//! A turn moves through `Starting` (spawn), `Running` (events flowing), and
//! exactly one terminal outcome: completed, failed, cancelled, or errored.
//! [`ProcessEvents`] adapts a live subprocess to the [`EventReader`] seam;
//! [`drive`] pumps any reader into an mpsc channel, giving cancellation
//! priority until a terminal event settles the outcome.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::process::ChildStdout;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::ThreadId;
use crate::error::{Error, Result};
use crate::exec::io::LineReader;
use crate::exec::CodexProcess;
use crate::protocol::{decode_line, Decoded, ThreadEvent};

/// Source of decoded thread events.
///
/// The live implementation wraps a subprocess; tests can drive scripted
/// sequences through the same seam.
pub trait EventReader: Send {
    /// Produce the next event, or `None` when the stream ends cleanly.
    fn next_event(&mut self) -> impl Future<Output = Result<Option<ThreadEvent>>> + Send;

    /// Release any resources backing the stream.
    ///
    /// Called when the turn is cancelled or abandoned before the stream
    /// ends on its own.
    fn shutdown(&mut self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// Event reader backed by a live `codex` subprocess.
pub(crate) struct ProcessEvents {
    lines: LineReader<ChildStdout>,
    process: CodexProcess,
    thread_id: Arc<StdMutex<Option<ThreadId>>>,
    started_items: HashSet<String>,
    saw_terminal: bool,
    finished: bool,
}

impl ProcessEvents {
    /// Wrap a freshly spawned process.
    ///
    /// The thread-id slot is filled from the first `thread.started` event,
    /// making the id visible to the owning thread while the turn runs.
    pub(crate) fn new(mut process: CodexProcess, thread_id: Arc<StdMutex<Option<ThreadId>>>) -> Self {
        let stdout = process.take_stdout().expect("stdout was configured");
        Self {
            lines: LineReader::new(stdout),
            process,
            thread_id,
            started_items: HashSet::new(),
            saw_terminal: false,
            finished: false,
        }
    }

    fn observe(&mut self, event: &ThreadEvent) {
        match event {
            ThreadEvent::ThreadStarted { thread_id } => {
                let mut slot = self.thread_id.lock().unwrap_or_else(|e| e.into_inner());
                if slot.is_none() {
                    *slot = Some(ThreadId::new(thread_id.clone()));
                }
            }
            ThreadEvent::ItemStarted { item } => {
                self.started_items.insert(item.id().to_string());
            }
            ThreadEvent::ItemUpdated { item } | ThreadEvent::ItemCompleted { item } => {
                if !self.started_items.contains(item.id()) {
                    tracing::warn!(id = item.id(), "item progressed without item.started");
                }
            }
            _ => {}
        }
        if event.is_terminal() {
            self.saw_terminal = true;
        }
    }

    /// Handle EOF on stdout: reap the process and decide the outcome.
    async fn finish(&mut self) -> Result<Option<ThreadEvent>> {
        self.finished = true;
        let status = self.process.wait().await?;
        let stderr = self.process.collect_stderr().await;

        if self.saw_terminal {
            return Ok(None);
        }
        if status.success() && stderr.is_empty() {
            // Clean exit with nothing to report; the stream just ends.
            return Ok(None);
        }
        Err(Error::ProcessFailed {
            code: status.code(),
            stderr,
        })
    }
}

impl EventReader for ProcessEvents {
    async fn next_event(&mut self) -> Result<Option<ThreadEvent>> {
        if self.finished {
            return Ok(None);
        }
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return self.finish().await;
            };
            match decode_line(&line) {
                Decoded::Event(event) => {
                    self.observe(&event);
                    return Ok(Some(event));
                }
                Decoded::Ignored => continue,
                Decoded::Invalid { tag, error } => {
                    tracing::debug!(tag, %error, "skipping malformed event payload");
                    continue;
                }
            }
        }
    }

    async fn shutdown(&mut self) {
        self.finished = true;
        if let Err(e) = self.process.shutdown().await {
            tracing::debug!(error = %e, "codex shutdown failed");
        }
    }
}

/// Pump events from a reader into a channel until the stream ends.
///
/// Cancellation is checked with priority before every read, so a token that
/// fires before the terminal event is fully processed always wins and the
/// turn ends with [`Error::Cancelled`]. Once a terminal event has been
/// forwarded the outcome is final: the token is no longer consulted, and a
/// late cancel is a no-op. A dropped receiver reclaims the subprocess
/// without surfacing an error.
pub(crate) async fn drive<R: EventReader>(
    mut reader: R,
    tx: mpsc::Sender<Result<ThreadEvent>>,
    cancel: CancellationToken,
) {
    let mut terminal_seen = false;
    loop {
        let next = if terminal_seen {
            tokio::select! {
                _ = tx.closed() => {
                    tracing::debug!("turn stream abandoned, reclaiming subprocess");
                    reader.shutdown().await;
                    return;
                }
                next = reader.next_event() => next,
            }
        } else {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    reader.shutdown().await;
                    let _ = tx.send(Err(Error::Cancelled)).await;
                    return;
                }
                _ = tx.closed() => {
                    tracing::debug!("turn stream abandoned, reclaiming subprocess");
                    reader.shutdown().await;
                    return;
                }
                next = reader.next_event() => next,
            }
        };

        match next {
            Ok(Some(event)) => {
                if event.is_terminal() {
                    terminal_seen = true;
                }
                if tx.send(Ok(event)).await.is_err() {
                    reader.shutdown().await;
                    return;
                }
            }
            Ok(None) => return,
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            }
        }
    }
}
