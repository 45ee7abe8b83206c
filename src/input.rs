//! User input model and prompt normalization.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One structured input entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserInput {
    /// A text fragment of the prompt.
    Text { text: String },
    /// A local image attached to the prompt.
    LocalImage { path: PathBuf },
}

/// Input for one turn: plain text or a list of structured entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Text(String),
    Items(Vec<UserInput>),
}

impl Input {
    /// Split the input into the prompt text and attached image paths.
    ///
    /// Text entries join with a blank line between them. An empty item list
    /// is rejected, since the CLI would have nothing to act on.
    pub(crate) fn normalize(self) -> Result<(String, Vec<PathBuf>)> {
        match self {
            Input::Text(text) => Ok((text, Vec::new())),
            Input::Items(items) => {
                if items.is_empty() {
                    return Err(Error::InvalidInput(
                        "input items must not be empty".to_string(),
                    ));
                }
                let mut texts = Vec::new();
                let mut images = Vec::new();
                for item in items {
                    match item {
                        UserInput::Text { text } => texts.push(text),
                        UserInput::LocalImage { path } => images.push(path),
                    }
                }
                Ok((texts.join("\n\n"), images))
            }
        }
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::Text(s.to_string())
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::Text(s)
    }
}
