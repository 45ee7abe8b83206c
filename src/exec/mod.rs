//! Subprocess management for the Codex CLI.
//!
//! Each turn runs as one `codex exec --experimental-json` invocation:
//! [`spawn`] builds the argument vector and environment, [`io`] frames the
//! newline-delimited stdout and captures stderr.

pub mod io;
pub mod spawn;

pub use io::LineReader;
pub use spawn::{CodexExec, CodexProcess, ExecArgs};

/// How long to wait after SIGTERM before resorting to SIGKILL.
pub(crate) const TERMINATION_GRACE: std::time::Duration = std::time::Duration::from_secs(5);
