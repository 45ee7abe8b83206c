//! Process spawning and lifecycle management.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, ChildStdout, Command};

use super::io::{write_prompt, StderrCapture};
use super::TERMINATION_GRACE;
use crate::config::{ThreadId, ThreadOptions};
use crate::error::{Error, Result};

/// Originator override passed to the CLI unless the caller already set one.
const INTERNAL_ORIGINATOR_ENV: &str = "CODEX_INTERNAL_ORIGINATOR_OVERRIDE";
const SDK_ORIGINATOR: &str = "codex_sdk_rs";

/// Everything one invocation needs beyond the client-level configuration.
#[derive(Debug, Clone, Default)]
pub struct ExecArgs {
    /// The prompt, written to the subprocess stdin.
    pub prompt: String,
    /// Image paths passed via `--image`.
    pub images: Vec<PathBuf>,
    /// Resume key for a continuing thread.
    pub thread_id: Option<ThreadId>,
    /// Thread-level options.
    pub options: ThreadOptions,
    /// Path of a staged output-schema file, if the turn has one.
    pub output_schema_path: Option<PathBuf>,
}

/// Client-level invocation state shared by every thread of one [`Codex`].
///
/// Holds the binary path, environment policy, and pre-serialized config
/// overrides. Each turn spawns a fresh subprocess through [`CodexExec::spawn`].
///
/// [`Codex`]: crate::Codex
#[derive(Debug)]
pub struct CodexExec {
    program: PathBuf,
    env_override: Option<HashMap<String, String>>,
    override_args: Vec<String>,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl CodexExec {
    pub fn new(
        program: Option<PathBuf>,
        env_override: Option<HashMap<String, String>>,
        override_args: Vec<String>,
        base_url: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            program: program.unwrap_or_else(|| PathBuf::from("codex")),
            env_override,
            override_args,
            base_url,
            api_key,
        }
    }

    /// Spawn a new Codex CLI process for one turn.
    ///
    /// The prompt is written to the subprocess stdin, which is then closed.
    pub async fn spawn(&self, args: &ExecArgs) -> Result<CodexProcess> {
        let argv = build_args(&self.override_args, args);
        tracing::debug!(program = %self.program.display(), ?argv, "spawning codex");

        let mut cmd = Command::new(&self.program);
        cmd.args(&argv);
        if let Some(ref env) = self.env_override {
            cmd.env_clear();
            cmd.envs(env);
            if !env.contains_key(INTERNAL_ORIGINATOR_ENV) {
                cmd.env(INTERNAL_ORIGINATOR_ENV, SDK_ORIGINATOR);
            }
        } else if std::env::var_os(INTERNAL_ORIGINATOR_ENV).is_none() {
            cmd.env(INTERNAL_ORIGINATOR_ENV, SDK_ORIGINATOR);
        }
        if let Some(ref base_url) = self.base_url {
            cmd.env("OPENAI_BASE_URL", base_url);
        }
        if let Some(ref api_key) = self.api_key {
            cmd.env("CODEX_API_KEY", api_key);
        }
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::CliNotFound {
                    searched: self.program.display().to_string(),
                }
            } else {
                Error::ProcessSpawn(e)
            }
        })?;

        let stdin = child.stdin.take().expect("stdin was configured");
        write_prompt(stdin, args.prompt.clone()).await?;

        let stdout = child.stdout.take().expect("stdout was configured");
        let stderr = child.stderr.take().expect("stderr was configured");

        Ok(CodexProcess {
            child,
            stdout: Some(stdout),
            stderr: Some(StderrCapture::spawn(stderr)),
        })
    }
}

/// A running Codex CLI process.
///
/// Manages the lifecycle of a single CLI invocation. Each turn spawns a new
/// process.
///
/// # Cancellation
///
/// Dropping a `CodexProcess` kills the subprocess if it is still running.
pub struct CodexProcess {
    child: Child,
    stdout: Option<ChildStdout>,
    stderr: Option<StderrCapture>,
}

impl CodexProcess {
    /// Take the stdout handle from this process.
    ///
    /// The handle can only be taken once.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.stdout.take()
    }

    /// Get the process ID of the running CLI.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the process to exit and return its exit status.
    pub async fn wait(&mut self) -> Result<std::process::ExitStatus> {
        self.child.wait().await.map_err(Error::io)
    }

    /// Wait for stderr to drain and return everything the process wrote.
    pub async fn collect_stderr(&mut self) -> String {
        match self.stderr.take() {
            Some(capture) => capture.finish().await,
            None => String::new(),
        }
    }

    /// Snapshot captured stderr without waiting for the pipe to close.
    pub fn stderr_snapshot(&self) -> String {
        self.stderr
            .as_ref()
            .map(StderrCapture::snapshot)
            .unwrap_or_default()
    }

    /// Try to kill the process without waiting.
    pub fn start_kill(&mut self) -> Result<()> {
        self.child.start_kill().map_err(Error::io)
    }

    /// Terminate the process gracefully.
    ///
    /// Sends SIGTERM and waits up to [`TERMINATION_GRACE`] for exit, then
    /// falls back to SIGKILL. On non-unix platforms this kills immediately.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.child.id().is_none() {
            // Already reaped.
            return Ok(());
        }

        #[cfg(unix)]
        {
            if let Some(pid) = self.child.id() {
                // SAFETY: pid came from a live child we own.
                unsafe {
                    libc::kill(pid as libc::pid_t, libc::SIGTERM);
                }
            }
            match tokio::time::timeout(TERMINATION_GRACE, self.child.wait()).await {
                Ok(status) => {
                    status.map_err(Error::io)?;
                    return Ok(());
                }
                Err(_) => {
                    tracing::debug!("codex ignored SIGTERM, killing");
                }
            }
        }

        self.child.start_kill().map_err(Error::io)?;
        self.child.wait().await.map_err(Error::io)?;
        Ok(())
    }
}

impl Drop for CodexProcess {
    fn drop(&mut self) {
        // Kill the process if it's still running
        let _ = self.child.start_kill();
    }
}

/// Build CLI arguments (prompt is sent via stdin, not as an argument).
fn build_args(override_args: &[String], args: &ExecArgs) -> Vec<String> {
    let mut argv = vec!["exec".to_string(), "--experimental-json".to_string()];

    for override_arg in override_args {
        argv.push("--config".to_string());
        argv.push(override_arg.clone());
    }

    let options = &args.options;

    if let Some(ref model) = options.model {
        argv.push("--model".to_string());
        argv.push(model.clone());
    }

    if let Some(mode) = options.sandbox_mode {
        argv.push("--sandbox".to_string());
        argv.push(mode.to_string());
    }

    if let Some(ref dir) = options.working_directory {
        argv.push("--cd".to_string());
        argv.push(dir.display().to_string());
    }

    for dir in &options.additional_directories {
        argv.push("--add-dir".to_string());
        argv.push(dir.display().to_string());
    }

    if options.skip_git_repo_check {
        argv.push("--skip-git-repo-check".to_string());
    }

    if let Some(ref path) = args.output_schema_path {
        argv.push("--output-schema".to_string());
        argv.push(path.display().to_string());
    }

    if let Some(effort) = options.model_reasoning_effort {
        argv.push("--config".to_string());
        argv.push(format!("model_reasoning_effort=\"{effort}\""));
    }

    if let Some(enabled) = options.network_access_enabled {
        argv.push("--config".to_string());
        argv.push(format!("sandbox_workspace_write.network_access={enabled}"));
    }

    if let Some(mode) = options.web_search_mode {
        argv.push("--config".to_string());
        argv.push(format!("web_search=\"{mode}\""));
    } else if let Some(enabled) = options.web_search_enabled {
        argv.push("--config".to_string());
        let mode = if enabled { "live" } else { "disabled" };
        argv.push(format!("web_search=\"{mode}\""));
    }

    if let Some(policy) = options.approval_policy {
        argv.push("--config".to_string());
        argv.push(format!("approval_policy=\"{policy}\""));
    }

    for image in &args.images {
        argv.push("--image".to_string());
        argv.push(image.display().to_string());
    }

    if let Some(ref id) = args.thread_id {
        argv.push("resume".to_string());
        argv.push(id.to_string());
    }

    argv
}
