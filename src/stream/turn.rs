//! Turn results.
//!
//! This module provides [`StreamedTurn`], which implements [`futures::Stream`]
//! to yield [`ThreadEvent`]s from a running turn, and [`Turn`], the buffered
//! result a completed stream folds into.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio::sync::OwnedMutexGuard;
use tokio_util::sync::CancellationToken;

use super::session::{drive, EventReader};
use crate::error::{Error, Result};
use crate::protocol::{ThreadEvent, ThreadItem, Usage};
use crate::schema::OutputSchemaFile;

/// The buffered result of one completed turn.
#[derive(Debug, Clone, Default)]
pub struct Turn {
    /// All completed items, in completion order.
    pub items: Vec<ThreadItem>,
    /// Text of the completed agent messages, newline-joined.
    pub final_response: String,
    /// Token usage reported by `turn.completed`, if the turn got that far.
    pub usage: Option<Usage>,
}

/// A live stream of events from one running turn.
///
/// Yields each [`ThreadEvent`] in protocol order. The stream is bound to a
/// single subprocess invocation: it is consumed by value and cannot be
/// restarted. Use [`StreamedTurn::collect`] to fold it into a [`Turn`].
///
/// # Cancellation
///
/// Dropping a `StreamedTurn` stops the background reader and kills the
/// subprocess.
///
/// # Example
///
/// ```ignore
/// use futures::StreamExt;
///
/// let mut turn = thread.run_streamed("Summarize the repo").await?;
/// while let Some(event) = turn.next().await {
///     match event? {
///         ThreadEvent::ItemCompleted { item } => println!("{item:?}"),
///         _ => {}
///     }
/// }
/// ```
#[derive(Debug)]
pub struct StreamedTurn {
    rx: mpsc::Receiver<Result<ThreadEvent>>,
    /// The drive task ends on its own once the channel closes.
    #[allow(dead_code)]
    task: tokio::task::JoinHandle<()>,
    /// Serializes turns on the owning thread for the life of this stream.
    _turn_guard: Option<OwnedMutexGuard<()>>,
    /// Keeps the staged schema file alive while the subprocess runs.
    _schema: Option<OutputSchemaFile>,
}

impl StreamedTurn {
    /// Start pumping a reader in the background.
    pub(crate) fn start<R: EventReader + 'static>(
        reader: R,
        cancel: CancellationToken,
        turn_guard: Option<OwnedMutexGuard<()>>,
        schema: Option<OutputSchemaFile>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let task = tokio::spawn(drive(reader, tx, cancel));
        Self {
            rx,
            task,
            _turn_guard: turn_guard,
            _schema: schema,
        }
    }

    /// Build a streamed turn from any event reader.
    ///
    /// Intended for tests that script event sequences without a subprocess.
    pub fn from_reader<R: EventReader + 'static>(reader: R) -> Self {
        Self::start(reader, CancellationToken::new(), None, None)
    }

    /// Like [`StreamedTurn::from_reader`], with a cancellation token attached.
    pub fn from_reader_cancellable<R: EventReader + 'static>(
        reader: R,
        cancel: CancellationToken,
    ) -> Self {
        Self::start(reader, cancel, None, None)
    }

    /// Fold the remaining events into a buffered [`Turn`].
    ///
    /// Completed items accumulate in order; `turn.failed` and stream `error`
    /// events become errors, matching what a buffered `run` call returns.
    pub async fn collect(mut self) -> Result<Turn> {
        use futures::StreamExt;

        let mut turn = Turn::default();

        while let Some(event) = self.next().await {
            match event? {
                ThreadEvent::ItemCompleted { item } => {
                    if let ThreadItem::AgentMessage(ref msg) = item {
                        if !turn.final_response.is_empty() {
                            turn.final_response.push('\n');
                        }
                        turn.final_response.push_str(&msg.text);
                    }
                    turn.items.push(item);
                }
                ThreadEvent::TurnCompleted { usage } => {
                    turn.usage = Some(usage);
                }
                ThreadEvent::TurnFailed { error } => {
                    return Err(Error::TurnFailed {
                        message: error.message,
                    });
                }
                ThreadEvent::Error { message } => {
                    return Err(Error::Stream { message });
                }
                _ => {}
            }
        }

        Ok(turn)
    }
}

impl Stream for StreamedTurn {
    type Item = Result<ThreadEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
