//! Token usage tracking types.

use serde::{Deserialize, Serialize};

/// Token usage statistics for a turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    /// Number of input tokens used during the turn.
    pub input_tokens: u64,
    /// Number of cached input tokens used during the turn.
    pub cached_input_tokens: u64,
    /// Number of output tokens generated during the turn.
    pub output_tokens: u64,
}

impl Usage {
    /// Create a new empty Usage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total tokens (input + cached input + output).
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.cached_input_tokens + self.output_tokens
    }

    /// Accumulate usage from another Usage instance.
    pub fn accumulate(&mut self, other: &Usage) {
        self.input_tokens += other.input_tokens;
        self.cached_input_tokens += other.cached_input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

impl std::ops::Add for Usage {
    type Output = Usage;

    fn add(self, other: Usage) -> Usage {
        Usage {
            input_tokens: self.input_tokens + other.input_tokens,
            cached_input_tokens: self.cached_input_tokens + other.cached_input_tokens,
            output_tokens: self.output_tokens + other.output_tokens,
        }
    }
}

impl std::ops::AddAssign for Usage {
    fn add_assign(&mut self, other: Usage) {
        self.accumulate(&other);
    }
}
