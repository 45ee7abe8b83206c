//! Thread façade.
//!
//! A [`Thread`] is a conversation with the agent. Each call to `run` or
//! `run_streamed` is one turn, executed as a fresh CLI invocation; the
//! thread id learned from the first turn is carried as the resume key for
//! every turn after it.

use std::sync::{Arc, Mutex as StdMutex};

use crate::config::{ThreadId, ThreadOptions, TurnOptions};
use crate::error::Result;
use crate::exec::{CodexExec, ExecArgs};
use crate::input::Input;
use crate::schema::OutputSchemaFile;
use crate::stream::session::ProcessEvents;
use crate::stream::{StreamedTurn, Turn};

/// A conversation thread with the Codex agent.
///
/// Created by [`Codex::start_thread`] or [`Codex::resume_thread`]. Turns on
/// one thread run strictly one at a time; concurrent `run` calls queue.
/// Separate threads are fully independent.
///
/// [`Codex::start_thread`]: crate::Codex::start_thread
/// [`Codex::resume_thread`]: crate::Codex::resume_thread
#[derive(Clone)]
pub struct Thread {
    exec: Arc<CodexExec>,
    options: ThreadOptions,
    id: Arc<StdMutex<Option<ThreadId>>>,
    turn_lock: Arc<tokio::sync::Mutex<()>>,
}

impl Thread {
    pub(crate) fn new(exec: Arc<CodexExec>, options: ThreadOptions, id: Option<ThreadId>) -> Self {
        Self {
            exec,
            options,
            id: Arc::new(StdMutex::new(id)),
            turn_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Get the thread id, once the first turn has reported it.
    ///
    /// `None` until the first `thread.started` event arrives; stable after
    /// that.
    pub fn id(&self) -> Option<ThreadId> {
        self.id.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Run one turn and wait for the buffered result.
    pub async fn run(&self, input: impl Into<Input>) -> Result<Turn> {
        self.run_with(input, TurnOptions::default()).await
    }

    /// Run one turn with per-turn options and wait for the buffered result.
    pub async fn run_with(&self, input: impl Into<Input>, options: TurnOptions) -> Result<Turn> {
        self.run_streamed_with(input, options).await?.collect().await
    }

    /// Run one turn, yielding events as they arrive.
    pub async fn run_streamed(&self, input: impl Into<Input>) -> Result<StreamedTurn> {
        self.run_streamed_with(input, TurnOptions::default()).await
    }

    /// Run one turn with per-turn options, yielding events as they arrive.
    ///
    /// The returned stream holds the thread's turn slot until it is fully
    /// consumed or dropped.
    pub async fn run_streamed_with(
        &self,
        input: impl Into<Input>,
        options: TurnOptions,
    ) -> Result<StreamedTurn> {
        let guard = Arc::clone(&self.turn_lock).lock_owned().await;

        let (prompt, images) = input.into().normalize()?;
        let schema = OutputSchemaFile::stage(options.output_schema.as_ref()).await?;

        let args = ExecArgs {
            prompt,
            images,
            thread_id: self.id(),
            options: self.options.clone(),
            output_schema_path: schema.as_ref().map(|s| s.path().to_path_buf()),
        };
        let process = self.exec.spawn(&args).await?;
        let reader = ProcessEvents::new(process, Arc::clone(&self.id));
        let cancel = options.cancellation.unwrap_or_default();

        Ok(StreamedTurn::start(reader, cancel, Some(guard), schema))
    }
}
