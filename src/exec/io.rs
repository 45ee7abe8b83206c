//! I/O primitives for communicating with the Codex CLI subprocess.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStderr, ChildStdin};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Read chunk size for stdout framing.
const CHUNK_SIZE: usize = 4096;

/// Reads newline-delimited lines from the CLI stdout.
///
/// The CLI emits one JSON record per line, but the OS delivers bytes in
/// arbitrary chunks. This reader buffers raw bytes and yields complete
/// lines, so the line sequence is identical no matter how the bytes were
/// chunked. A non-empty trailing line without a final newline is flushed
/// at EOF.
pub struct LineReader<R> {
    reader: R,
    buffer: Vec<u8>,
    /// Complete lines split off the buffer but not yet handed out.
    ready: std::collections::VecDeque<String>,
    eof: bool,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// Create a new reader over any async byte source.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(CHUNK_SIZE),
            ready: std::collections::VecDeque::new(),
            eof: false,
        }
    }

    /// Read the next non-empty line.
    ///
    /// Returns `Ok(Some(line))` for each line (trailing `\r` stripped),
    /// `Ok(None)` at EOF, or `Err` on I/O failure.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            while let Some(line) = self.ready.pop_front() {
                if !line.is_empty() {
                    return Ok(Some(line));
                }
            }

            if self.eof {
                return Ok(None);
            }

            let mut chunk = [0u8; CHUNK_SIZE];
            let n = self.reader.read(&mut chunk).await.map_err(Error::io)?;
            if n == 0 {
                self.eof = true;
                // Flush a trailing line that was never newline-terminated.
                if !self.buffer.is_empty() {
                    let rest = std::mem::take(&mut self.buffer);
                    self.ready.push_back(Self::decode(rest));
                }
                continue;
            }

            self.buffer.extend_from_slice(&chunk[..n]);
            while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
                line.pop(); // the newline itself
                self.ready.push_back(Self::decode(line));
            }
        }
    }

    fn decode(mut bytes: Vec<u8>) -> String {
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Writes the prompt to the CLI stdin and closes it.
///
/// Closing stdin signals to the CLI that input is complete. A broken pipe
/// is tolerated: the process may exit (or fail) before reading the prompt,
/// and that outcome is reported through the event stream instead.
pub async fn write_prompt(mut stdin: ChildStdin, prompt: String) -> Result<()> {
    let outcome = async {
        stdin.write_all(prompt.as_bytes()).await?;
        stdin.shutdown().await
    }
    .await;

    match outcome {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {
            tracing::debug!("codex closed stdin before the prompt was fully written");
            Ok(())
        }
        Err(err) => Err(Error::io(err)),
    }
}

/// Collects stderr output in the background for error reporting.
///
/// Stderr typically carries CLI logs and diagnostics. The capture runs as
/// a task so stderr cannot fill its pipe and stall the process while we
/// read stdout.
pub struct StderrCapture {
    collected: Arc<Mutex<String>>,
    task: Option<JoinHandle<()>>,
}

impl StderrCapture {
    /// Start draining a child stderr into an in-memory buffer.
    pub fn spawn(stderr: ChildStderr) -> Self {
        let collected = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&collected);
        let task = tokio::spawn(async move {
            let mut reader = LineReader::new(stderr);
            while let Ok(Some(line)) = reader.next_line().await {
                let mut buf = sink.lock().unwrap_or_else(|e| e.into_inner());
                if !buf.is_empty() {
                    buf.push('\n');
                }
                buf.push_str(&line);
            }
        });
        Self {
            collected,
            task: Some(task),
        }
    }

    /// Wait for stderr to drain and return everything captured so far.
    pub async fn finish(mut self) -> String {
        // The drain task ends when the pipe closes; a panic there only
        // loses diagnostics.
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.collected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Snapshot the captured output without waiting for EOF.
    pub fn snapshot(&self) -> String {
        self.collected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Drop for StderrCapture {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
