//! # libcodex
//!
//! An async Rust client for the Codex CLI. Each turn runs
//! `codex exec --experimental-json` as a subprocess and streams its
//! newline-delimited JSON events back as typed values.
//!
//! ## Quick start
//!
//! ```ignore
//! use libcodex::Codex;
//!
//! #[tokio::main]
//! async fn main() -> libcodex::Result<()> {
//!     let codex = Codex::builder().build()?;
//!     let thread = codex.start_thread();
//!
//!     let turn = thread.run("Explain what this repository does").await?;
//!     println!("{}", turn.final_response);
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```ignore
//! use futures::StreamExt;
//! use libcodex::{Codex, ThreadEvent};
//!
//! let codex = Codex::builder().build()?;
//! let thread = codex.start_thread();
//! let mut turn = thread.run_streamed("Refactor src/main.rs").await?;
//!
//! while let Some(event) = turn.next().await {
//!     match event? {
//!         ThreadEvent::ItemCompleted { item } => println!("done: {}", item.id()),
//!         ThreadEvent::TurnCompleted { usage } => println!("{} tokens", usage.total_tokens()),
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Resuming a thread
//!
//! The thread id from the first turn is the resume key:
//!
//! ```ignore
//! let thread = codex.start_thread();
//! thread.run("Start a plan").await?;
//! let id = thread.id().expect("first turn reported the id");
//!
//! // Later, possibly in another process:
//! let thread = codex.resume_thread(id);
//! thread.run("Continue the plan").await?;
//! ```
//!
//! ## Cancellation
//!
//! Attach a [`CancellationToken`](tokio_util::sync::CancellationToken) via
//! [`TurnOptions`]; cancelling it terminates the subprocess and ends the
//! turn with [`Error::Cancelled`].

pub mod codex;
pub mod config;
pub mod error;
pub mod exec;
pub mod input;
pub mod protocol;
mod schema;
pub mod stream;
pub mod thread;

pub use codex::{Codex, CodexBuilder};
pub use config::{
    ApprovalMode, ReasoningEffort, SandboxMode, ThreadId, ThreadOptions, TurnOptions,
    WebSearchMode,
};
pub use error::{Error, Result};
pub use input::{Input, UserInput};
pub use protocol::{ThreadEvent, ThreadItem, Usage};
pub use stream::{EventReader, StreamedTurn, Turn};
pub use thread::Thread;
