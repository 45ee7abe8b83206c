//! Thread event types.
//!
//! The Codex CLI emits one JSON event per line on stdout. Each event is one
//! of eight tags describing thread, turn, or item lifecycle progress.

use serde::{Deserialize, Serialize};

use super::items::ThreadItem;
use super::usage::Usage;

/// Fatal error payload carried by `turn.failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadError {
    pub message: String,
}

/// One decoded protocol record from the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ThreadEvent {
    /// Emitted when a new thread is started, as the first event.
    ///
    /// The carried `thread_id` can be used to resume the thread later.
    #[serde(rename = "thread.started")]
    ThreadStarted { thread_id: String },

    /// Emitted when a turn is started by sending a new prompt to the model.
    ///
    /// A turn encompasses all events that happen while the agent is
    /// processing the prompt.
    #[serde(rename = "turn.started")]
    TurnStarted,

    /// Emitted when a turn is completed, typically right after the
    /// assistant's response.
    #[serde(rename = "turn.completed")]
    TurnCompleted { usage: Usage },

    /// Indicates that a turn failed with an agent-reported error.
    #[serde(rename = "turn.failed")]
    TurnFailed { error: ThreadError },

    /// Emitted when a new item is added to the thread, typically still
    /// in progress.
    #[serde(rename = "item.started")]
    ItemStarted { item: ThreadItem },

    /// Emitted when an item is updated.
    #[serde(rename = "item.updated")]
    ItemUpdated { item: ThreadItem },

    /// Signals that an item has reached a terminal state, success or failure.
    #[serde(rename = "item.completed")]
    ItemCompleted { item: ThreadItem },

    /// An unrecoverable error emitted directly by the event stream.
    #[serde(rename = "error")]
    Error { message: String },
}

impl ThreadEvent {
    /// Check whether this event terminates the turn.
    ///
    /// At most one terminal event is emitted per turn: `turn.completed`,
    /// `turn.failed`, or `error`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ThreadEvent::TurnCompleted { .. }
                | ThreadEvent::TurnFailed { .. }
                | ThreadEvent::Error { .. }
        )
    }

    /// Get the item carried by an `item.*` event, if any.
    pub fn item(&self) -> Option<&ThreadItem> {
        match self {
            ThreadEvent::ItemStarted { item }
            | ThreadEvent::ItemUpdated { item }
            | ThreadEvent::ItemCompleted { item } => Some(item),
            _ => None,
        }
    }
}
