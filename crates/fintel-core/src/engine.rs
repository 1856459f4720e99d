//! Bounded, single-shot invocation of the external OCR engine.
//!
//! The engine is a separate process (by default `node ocrScript.js`)
//! taking two positional arguments, an image path and a prompt, and
//! printing its answer to stdout. One call per document: no retry, no
//! backoff, no streaming.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::EngineError;

/// Default invocation timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default environment variable carrying the engine's API credential.
pub const DEFAULT_CREDENTIAL_VAR: &str = "GROQ_API_KEY";

/// OCR engine invocation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Argv prefix for the engine process; the image path and prompt are
    /// appended as positional arguments.
    pub command: Vec<String>,

    /// Name of the environment variable carrying the API credential.
    pub credential_var: String,

    /// Hard per-invocation timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: vec!["node".to_string(), "ocrScript.js".to_string()],
            credential_var: DEFAULT_CREDENTIAL_VAR.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Handle to the external OCR engine.
///
/// The credential is resolved once at construction and injected into
/// every child process, so the engine is testable with injected values
/// instead of ambient process state.
#[derive(Debug, Clone)]
pub struct OcrEngine {
    config: EngineConfig,
    credential: String,
}

impl OcrEngine {
    /// Build an engine, reading the credential from the configured
    /// environment variable.
    ///
    /// Fails before any invocation if the variable is unset, so a
    /// missing credential surfaces as a configuration error rather than
    /// a downstream engine failure.
    pub fn from_env(config: EngineConfig) -> Result<Self, EngineError> {
        match std::env::var(&config.credential_var) {
            Ok(credential) if !credential.is_empty() => Ok(Self { config, credential }),
            _ => Err(EngineError::MissingCredential(config.credential_var.clone())),
        }
    }

    /// Build an engine with an explicitly injected credential.
    pub fn with_credential(config: EngineConfig, credential: impl Into<String>) -> Self {
        Self {
            config,
            credential: credential.into(),
        }
    }

    /// Invoke the engine on one document image.
    ///
    /// Blocks (asynchronously) until the process exits or the timeout
    /// elapses; on timeout the child is killed.
    pub async fn invoke(&self, image_path: &Path, prompt: &str) -> Result<String, EngineError> {
        let (program, prefix) = self
            .config
            .command
            .split_first()
            .ok_or_else(|| EngineError::Spawn("engine command is empty".to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(prefix)
            .arg(image_path)
            .arg(prompt)
            .env(&self.config.credential_var, &self.credential)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Backstop: if the handle is ever dropped mid-flight, the
            // child goes down with it.
            .kill_on_drop(true);

        debug!(
            program = %program,
            image = %image_path.display(),
            timeout_secs = self.config.timeout_secs,
            "invoking OCR engine"
        );

        let mut child = cmd.spawn().map_err(|e| EngineError::Spawn(e.to_string()))?;
        let mut stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("engine stdout was not captured".to_string()))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::Spawn("engine stderr was not captured".to_string()))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        // Both pipes are drained before waiting so the child can never
        // block on a full pipe buffer.
        let waited = timeout(Duration::from_secs(self.config.timeout_secs), async {
            tokio::try_join!(
                stdout_pipe.read_to_end(&mut stdout),
                stderr_pipe.read_to_end(&mut stderr),
            )?;
            child.wait().await
        })
        .await;

        let status = match waited {
            Ok(result) => result.map_err(|e| EngineError::Spawn(e.to_string()))?,
            Err(_) => {
                // Kill explicitly and reap the child before reporting,
                // so no zombie outlives the timeout.
                let _ = child.start_kill();
                let _ = child.wait().await;
                warn!(image = %image_path.display(), "OCR engine invocation timed out");
                return Err(EngineError::Timeout {
                    seconds: self.config.timeout_secs,
                });
            }
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            return Err(EngineError::Failed {
                status: status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}
