// src/assets/compiler.rs

//! Synchronous asset-compiler invocation.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// Fixed result lines printed after a compile run.
pub const COMPILE_OK_MESSAGE: &str = "Compiled successfuly";
pub const COMPILE_FAILED_MESSAGE: &str = "Failed to compile asset!";

/// One compiler run: executable, asset root, verbosity.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub compiler: PathBuf,
    pub path: PathBuf,
    pub verbose: bool,
}

/// What the compiler reported through its exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileOutcome {
    Success,
    Failed(i32),
}

impl CompileRequest {
    /// The full argument vector, compiler executable included:
    /// `[<compiler>, --verbose=0|1, --path, <path>]`.
    pub fn argv(&self) -> Vec<String> {
        vec![
            self.compiler.to_string_lossy().into_owned(),
            format!("--verbose={}", if self.verbose { 1 } else { 0 }),
            "--path".to_string(),
            self.path.to_string_lossy().into_owned(),
        ]
    }

    /// Spawn the compiler and block until it exits.
    ///
    /// Only the exit code is interpreted; compiler output is consumed and
    /// logged at debug. There is no timeout on the wait.
    pub async fn run(&self) -> Result<CompileOutcome> {
        let argv = self.argv();
        info!(cmd = ?argv, "invoking asset compiler");

        let mut child = Command::new(&self.compiler)
            .args(&argv[1..])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawning asset compiler {:?}", self.compiler))?;

        // Consume both pipes so the child never blocks on a full buffer.
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!("compiler stdout: {}", line);
                }
            });
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!("compiler stderr: {}", line);
                }
            });
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for asset compiler {:?}", self.compiler))?;

        let code = status.code().unwrap_or(-1);
        info!(exit_code = code, success = status.success(), "asset compiler exited");

        if status.success() {
            Ok(CompileOutcome::Success)
        } else {
            Ok(CompileOutcome::Failed(code))
        }
    }
}

impl CompileOutcome {
    /// The fixed human-readable result line for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            CompileOutcome::Success => COMPILE_OK_MESSAGE,
            CompileOutcome::Failed(_) => COMPILE_FAILED_MESSAGE,
        }
    }

    /// Exit code for the wrapping command; compiler failures propagate so
    /// callers can script against it.
    pub fn exit_code(&self) -> i32 {
        match self {
            CompileOutcome::Success => 0,
            CompileOutcome::Failed(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_matches_compiler_contract() {
        let req = CompileRequest {
            compiler: PathBuf::from("/bin/ac"),
            path: PathBuf::from("/assets"),
            verbose: true,
        };
        assert_eq!(
            req.argv(),
            vec!["/bin/ac", "--verbose=1", "--path", "/assets"]
        );
    }

    #[test]
    fn argv_encodes_verbose_off_as_zero() {
        let req = CompileRequest {
            compiler: PathBuf::from("ac"),
            path: PathBuf::from("assets"),
            verbose: false,
        };
        assert_eq!(req.argv()[1], "--verbose=0");
    }

    #[test]
    fn outcome_messages_are_fixed() {
        assert_eq!(CompileOutcome::Success.message(), "Compiled successfuly");
        assert_eq!(
            CompileOutcome::Failed(1).message(),
            "Failed to compile asset!"
        );
    }

    #[test]
    fn failure_exit_code_propagates() {
        assert_eq!(CompileOutcome::Success.exit_code(), 0);
        assert_eq!(CompileOutcome::Failed(3).exit_code(), 3);
    }
}
