//! Wire protocol types for the Codex CLI's experimental JSON interface.
//!
//! Each line on the subprocess stdout is one JSON record tagged by a `type`
//! field. [`events`] and [`items`] model the records, [`decode`] turns raw
//! lines into them with a skip-on-noise policy.

pub mod decode;
pub mod events;
pub mod items;
pub mod usage;

pub use decode::{decode_line, Decoded};
pub use events::{ThreadError, ThreadEvent};
pub use items::{
    AgentMessageItem, CommandExecutionItem, CommandExecutionStatus, ErrorItem, FileChangeItem,
    FileUpdateChange, McpContentBlock, McpToolCallItem, McpToolCallStatus, McpToolError,
    McpToolResult, PatchApplyStatus, PatchChangeKind, ReasoningItem, ThreadItem, TodoEntry,
    TodoListItem, WebSearchItem,
};
pub use usage::Usage;
