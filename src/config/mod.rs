//! Configuration types for threads, turns, and client-level overrides.

pub mod options;
pub mod overrides;

pub use options::{
    ApprovalMode, ReasoningEffort, SandboxMode, ThreadId, ThreadOptions, TurnOptions,
    WebSearchMode,
};
pub use overrides::serialize_overrides;
