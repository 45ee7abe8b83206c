//! Thread item types.
//!
//! A [`ThreadItem`] is one unit of agent-produced work: a message, a
//! reasoning summary, a command run, a file change, an MCP tool call, a web
//! search, a to-do list, or a non-fatal error. Items carry a stable `id`
//! used to correlate `item.started` → `item.updated` → `item.completed`
//! events for the same logical unit.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of work produced by the agent during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThreadItem {
    /// Response from the agent: natural-language text, or JSON when
    /// structured output was requested.
    AgentMessage(AgentMessageItem),
    /// The agent's reasoning summary.
    Reasoning(ReasoningItem),
    /// A command executed by the agent.
    CommandExecution(CommandExecutionItem),
    /// A set of file changes applied by the agent.
    FileChange(FileChangeItem),
    /// A call to an MCP tool.
    McpToolCall(McpToolCallItem),
    /// A web search request.
    WebSearch(WebSearchItem),
    /// The agent's running to-do list.
    TodoList(TodoListItem),
    /// A non-fatal error surfaced as an item.
    Error(ErrorItem),
}

impl ThreadItem {
    /// The stable identifier of this item.
    pub fn id(&self) -> &str {
        match self {
            ThreadItem::AgentMessage(item) => &item.id,
            ThreadItem::Reasoning(item) => &item.id,
            ThreadItem::CommandExecution(item) => &item.id,
            ThreadItem::FileChange(item) => &item.id,
            ThreadItem::McpToolCall(item) => &item.id,
            ThreadItem::WebSearch(item) => &item.id,
            ThreadItem::TodoList(item) => &item.id,
            ThreadItem::Error(item) => &item.id,
        }
    }

    /// Get the agent message payload, if this is an `agent_message` item.
    pub fn as_agent_message(&self) -> Option<&AgentMessageItem> {
        match self {
            ThreadItem::AgentMessage(item) => Some(item),
            _ => None,
        }
    }

    /// Check if this is an `agent_message` item.
    pub fn is_agent_message(&self) -> bool {
        matches!(self, ThreadItem::AgentMessage(_))
    }
}

/// Response text from the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessageItem {
    pub id: String,
    /// Either natural-language text or JSON when structured output is requested.
    pub text: String,
}

/// The agent's reasoning summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningItem {
    pub id: String,
    pub text: String,
}

/// The status of a command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandExecutionStatus {
    InProgress,
    Completed,
    Failed,
}

/// A command executed by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandExecutionItem {
    pub id: String,
    /// The command line executed by the agent.
    pub command: String,
    /// Aggregated stdout and stderr captured while the command was running.
    #[serde(default)]
    pub aggregated_output: String,
    /// Current status of the command execution.
    pub status: CommandExecutionStatus,
    /// Set when the command exits; absent while still running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// Indicates the type of a file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchChangeKind {
    Add,
    Delete,
    Update,
}

/// The status of a file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchApplyStatus {
    Completed,
    Failed,
}

/// One file touched by a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUpdateChange {
    pub path: String,
    pub kind: PatchChangeKind,
}

/// A set of file changes by the agent. Emitted once the patch succeeds or fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChangeItem {
    pub id: String,
    /// Individual file changes that comprise the patch.
    pub changes: Vec<FileUpdateChange>,
    /// Whether the patch ultimately succeeded or failed.
    pub status: PatchApplyStatus,
}

/// The status of an MCP tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpToolCallStatus {
    InProgress,
    Completed,
    Failed,
}

/// A content block from an MCP tool result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpContentBlock {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Result payload returned by the MCP server for successful calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpToolResult {
    pub content: Vec<McpContentBlock>,
    pub structured_content: Value,
}

/// Error message reported for failed MCP calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpToolError {
    pub message: String,
}

/// A call to an MCP tool.
///
/// The item starts when the invocation is dispatched and completes when the
/// MCP server reports success or failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpToolCallItem {
    pub id: String,
    /// Name of the MCP server handling the request.
    pub server: String,
    /// The tool invoked on the MCP server.
    pub tool: String,
    /// Arguments forwarded to the tool invocation.
    #[serde(default)]
    pub arguments: Value,
    /// Current status of the tool invocation.
    pub status: McpToolCallStatus,
    /// Result payload returned by the MCP server for successful calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<McpToolResult>,
    /// Error message reported for failed calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<McpToolError>,
}

/// A web search request. Completes when results are returned to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchItem {
    pub id: String,
    pub query: String,
}

/// One entry in the agent's to-do list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoEntry {
    pub text: String,
    pub completed: bool,
}

/// The agent's running to-do list.
///
/// Starts when the plan is issued, updates as steps change, and completes
/// when the turn ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoListItem {
    pub id: String,
    pub items: Vec<TodoEntry>,
}

/// A non-fatal error surfaced as an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub id: String,
    pub message: String,
}
