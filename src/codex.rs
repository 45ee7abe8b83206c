//! Client entry point.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::config::{overrides::serialize_overrides, ThreadId, ThreadOptions};
use crate::error::Result;
use crate::exec::CodexExec;
use crate::thread::Thread;

/// Client for the Codex CLI.
///
/// Holds the client-level configuration shared by every thread. Cheap to
/// clone; all threads started from one client share the same binary path,
/// environment policy, and config overrides.
///
/// # Example
///
/// ```ignore
/// let codex = Codex::builder().build()?;
/// let thread = codex.start_thread();
/// let turn = thread.run("List the files in this repo").await?;
/// println!("{}", turn.final_response);
/// ```
#[derive(Clone, Debug)]
pub struct Codex {
    exec: Arc<CodexExec>,
}

impl Codex {
    /// Create a builder for configuring the client.
    pub fn builder() -> CodexBuilder {
        CodexBuilder::default()
    }

    /// Start a new conversation thread.
    pub fn start_thread(&self) -> Thread {
        self.start_thread_with(ThreadOptions::default())
    }

    /// Start a new conversation thread with options.
    pub fn start_thread_with(&self, options: ThreadOptions) -> Thread {
        Thread::new(Arc::clone(&self.exec), options, None)
    }

    /// Resume an existing thread by id.
    ///
    /// The id is carried as the resume key on every turn.
    pub fn resume_thread(&self, id: impl Into<ThreadId>) -> Thread {
        self.resume_thread_with(id, ThreadOptions::default())
    }

    /// Resume an existing thread by id, with options.
    pub fn resume_thread_with(&self, id: impl Into<ThreadId>, options: ThreadOptions) -> Thread {
        Thread::new(Arc::clone(&self.exec), options, Some(id.into()))
    }
}

/// Builder for [`Codex`] client configuration.
#[derive(Debug, Default)]
pub struct CodexBuilder {
    codex_path: Option<PathBuf>,
    base_url: Option<String>,
    api_key: Option<String>,
    env: Option<HashMap<String, String>>,
    config_overrides: Option<Value>,
}

impl CodexBuilder {
    /// Use a specific `codex` binary instead of resolving from PATH.
    pub fn codex_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.codex_path = Some(path.into());
        self
    }

    /// Point the CLI at a different API endpoint (`OPENAI_BASE_URL`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// API key passed to the CLI (`CODEX_API_KEY`).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Replace the subprocess environment entirely.
    ///
    /// When set, the child does not inherit the parent environment; only
    /// these variables (plus the ones this crate sets itself) are visible.
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Nested config overrides, passed as `--config` arguments.
    ///
    /// Must be a plain JSON object; see [`crate::config::serialize_overrides`]
    /// for the flattening rules.
    pub fn config_overrides(mut self, overrides: Value) -> Self {
        self.config_overrides = Some(overrides);
        self
    }

    /// Build the client, validating the config overrides.
    pub fn build(self) -> Result<Codex> {
        let override_args = match self.config_overrides {
            Some(ref overrides) => serialize_overrides(overrides)?,
            None => Vec::new(),
        };

        Ok(Codex {
            exec: Arc::new(CodexExec::new(
                self.codex_path,
                self.env,
                override_args,
                self.base_url,
                self.api_key,
            )),
        })
    }
}
