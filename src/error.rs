/// Errors that can occur when using libcodex.
///
/// Errors are organized by category:
/// - Configuration errors: detected at `build()` time or before spawn
/// - Launch errors: failed to start the Codex CLI process
/// - IO errors: communication failures with the subprocess
/// - Protocol errors: the subprocess died or reported a fatal stream error
/// - Turn errors: the agent itself reported failure, or the turn was cancelled
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    // -------------------------------------------------------------------------
    // Configuration errors
    // -------------------------------------------------------------------------
    /// Invalid client configuration (e.g., a malformed config override).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid user input (e.g., an empty structured input list).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The output schema was not a plain JSON object.
    #[error("invalid output schema: {0}")]
    InvalidSchema(String),

    // -------------------------------------------------------------------------
    // Launch errors
    // -------------------------------------------------------------------------
    /// Codex CLI binary not found.
    #[error("codex CLI not found (searched: {searched})")]
    CliNotFound { searched: String },

    /// Failed to spawn the codex subprocess.
    #[error("failed to spawn codex process: {0}")]
    ProcessSpawn(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // IO errors
    // -------------------------------------------------------------------------
    /// IO error communicating with the codex subprocess.
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol errors
    // -------------------------------------------------------------------------
    /// The subprocess exited abnormally with no terminal event on the stream.
    ///
    /// Carries the exit code (when the process was not killed by a signal)
    /// and whatever stderr output was captured.
    #[error("codex exited with {} before completing the turn: {stderr}", exit_code_label(.code))]
    ProcessFailed { code: Option<i32>, stderr: String },

    /// The stream emitted a fatal `error` event.
    #[error("codex stream error: {message}")]
    Stream { message: String },

    // -------------------------------------------------------------------------
    // Turn errors
    // -------------------------------------------------------------------------
    /// The agent reported that the turn failed (a `turn.failed` event).
    #[error("turn failed: {message}")]
    TurnFailed { message: String },

    /// The turn was cancelled via its cancellation token.
    #[error("turn cancelled")]
    Cancelled,
}

/// A specialized Result type for libcodex operations.
pub type Result<T> = std::result::Result<T, Error>;

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "signal".to_string(),
    }
}

impl Error {
    /// Create an IO error.
    pub fn io(source: std::io::Error) -> Self {
        Self::Io(source)
    }

    /// Check if this error came from the agent rather than the transport.
    ///
    /// `TurnFailed` means the agent processed the prompt and reported a
    /// failure; everything else is a client, launch, or transport fault.
    pub fn is_turn_failure(&self) -> bool {
        matches!(self, Error::TurnFailed { .. })
    }

    /// Check if this error is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
