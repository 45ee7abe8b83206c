//! Type-safe configuration options for threads and turns.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Newtype for thread IDs to prevent string mixups.
///
/// Assigned by the CLI on the first `thread.started` event and used as the
/// resume key for follow-up turns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub String);

impl ThreadId {
    /// Create a new ThreadId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        ThreadId(id.into())
    }

    /// Get the thread ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        ThreadId::new(s)
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        ThreadId(s)
    }
}

/// Sandbox execution mode for the Codex CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SandboxMode {
    /// The agent may read files but not modify anything.
    ReadOnly,
    /// The agent may write within the workspace directories.
    WorkspaceWrite,
    /// No sandboxing at all (use with caution).
    DangerFullAccess,
}

impl fmt::Display for SandboxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SandboxMode::ReadOnly => write!(f, "read-only"),
            SandboxMode::WorkspaceWrite => write!(f, "workspace-write"),
            SandboxMode::DangerFullAccess => write!(f, "danger-full-access"),
        }
    }
}

/// Approval policy for agent actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalMode {
    /// Never ask for approval.
    Never,
    /// Ask only when the agent requests it.
    OnRequest,
    /// Ask after a failed action.
    OnFailure,
    /// Ask before any untrusted action.
    Untrusted,
}

impl fmt::Display for ApprovalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalMode::Never => write!(f, "never"),
            ApprovalMode::OnRequest => write!(f, "on-request"),
            ApprovalMode::OnFailure => write!(f, "on-failure"),
            ApprovalMode::Untrusted => write!(f, "untrusted"),
        }
    }
}

/// Reasoning effort level for the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
    Xhigh,
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReasoningEffort::Minimal => write!(f, "minimal"),
            ReasoningEffort::Low => write!(f, "low"),
            ReasoningEffort::Medium => write!(f, "medium"),
            ReasoningEffort::High => write!(f, "high"),
            ReasoningEffort::Xhigh => write!(f, "xhigh"),
        }
    }
}

/// Web search configuration mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebSearchMode {
    /// No web search at all.
    Disabled,
    /// Search against cached results only.
    Cached,
    /// Full live web search.
    Live,
}

impl fmt::Display for WebSearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebSearchMode::Disabled => write!(f, "disabled"),
            WebSearchMode::Cached => write!(f, "cached"),
            WebSearchMode::Live => write!(f, "live"),
        }
    }
}

/// Configuration options for thread creation.
///
/// All fields default to "not set", which leaves the CLI's own defaults in
/// effect. Options apply to every turn run on the thread.
#[derive(Debug, Clone, Default)]
pub struct ThreadOptions {
    /// Model to use for the thread.
    pub model: Option<String>,
    /// Sandbox execution mode.
    pub sandbox_mode: Option<SandboxMode>,
    /// Working directory for the agent (`--cd`).
    pub working_directory: Option<PathBuf>,
    /// Additional directories accessible to the agent (`--add-dir`).
    pub additional_directories: Vec<PathBuf>,
    /// Skip Git repository validation.
    pub skip_git_repo_check: bool,
    /// Reasoning effort level.
    pub model_reasoning_effort: Option<ReasoningEffort>,
    /// Enable network access inside the workspace-write sandbox.
    pub network_access_enabled: Option<bool>,
    /// Web search configuration mode.
    pub web_search_mode: Option<WebSearchMode>,
    /// Enable web search capability (legacy; prefer `web_search_mode`).
    pub web_search_enabled: Option<bool>,
    /// Approval policy for agent actions.
    pub approval_policy: Option<ApprovalMode>,
}

impl ThreadOptions {
    /// Create options with everything left at the CLI defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sandbox mode.
    pub fn sandbox_mode(mut self, mode: SandboxMode) -> Self {
        self.sandbox_mode = Some(mode);
        self
    }

    /// Set the working directory.
    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Grant the agent access to an additional directory.
    pub fn additional_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.additional_directories.push(dir.into());
        self
    }

    /// Skip Git repository validation.
    pub fn skip_git_repo_check(mut self, skip: bool) -> Self {
        self.skip_git_repo_check = skip;
        self
    }

    /// Set the reasoning effort level.
    pub fn model_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.model_reasoning_effort = Some(effort);
        self
    }

    /// Enable or disable network access in the sandbox.
    pub fn network_access_enabled(mut self, enabled: bool) -> Self {
        self.network_access_enabled = Some(enabled);
        self
    }

    /// Set the web search mode.
    pub fn web_search_mode(mut self, mode: WebSearchMode) -> Self {
        self.web_search_mode = Some(mode);
        self
    }

    /// Set the approval policy.
    pub fn approval_policy(mut self, policy: ApprovalMode) -> Self {
        self.approval_policy = Some(policy);
        self
    }
}

/// Per-turn options.
#[derive(Debug, Clone, Default)]
pub struct TurnOptions {
    /// JSON schema the final agent message must conform to.
    ///
    /// Must be a plain JSON object; it is staged to a temporary file and
    /// passed via `--output-schema`.
    pub output_schema: Option<Value>,
    /// Token for cooperative cancellation of the turn.
    pub cancellation: Option<CancellationToken>,
}

impl TurnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output schema for the turn.
    pub fn output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Attach a cancellation token to the turn.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}
