use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::analyzer::ScriptError;

/// Runs inference scripts through a fixed interpreter with a hard timeout.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    interpreter: String,
    scripts_dir: PathBuf,
    timeout: Duration,
}

impl ScriptRunner {
    pub fn new(
        interpreter: impl Into<String>,
        scripts_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            interpreter: interpreter.into(),
            scripts_dir: scripts_dir.into(),
            timeout,
        }
    }

    pub fn script_path(&self, script: &str) -> PathBuf {
        self.scripts_dir.join(script)
    }

    /// Runs `<interpreter> <scripts_dir>/<script> <args..>` and returns the
    /// trimmed stdout lines in order. Blank lines at either end are dropped;
    /// blank lines in between are kept since positional output relies on them.
    ///
    /// A non-zero exit is logged but not treated as failure: the scripts
    /// print a usable score even on some error paths, and callers decide
    /// what an empty result means.
    pub async fn run(&self, script: &str, args: &[&str]) -> Result<Vec<String>, ScriptError> {
        let path = self.script_path(script);
        let rendered = format!("{} {} {}", self.interpreter, path.display(), args.join(" "));
        debug!("Running script: {rendered}");

        let child = Command::new(&self.interpreter)
            .arg(&path)
            .args(args)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ScriptError::Spawn {
                command: rendered.clone(),
                source,
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| ScriptError::Spawn {
                command: rendered.clone(),
                source,
            })?,
            Err(_) => {
                return Err(ScriptError::Timeout {
                    command: rendered,
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            debug!("[{script} stderr] {line}");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let lines: Vec<String> = stdout.trim().lines().map(|l| l.trim().to_string()).collect();
        for line in &lines {
            debug!("[{script}] {line}");
        }

        if !output.status.success() {
            warn!("{rendered} exited with {}", output.status);
        }

        Ok(lines)
    }
}

/// Normalises Windows separators the way the scripts expect their path argument.
pub fn script_arg(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
