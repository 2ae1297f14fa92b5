// src/engine/process.rs

//! Owning handle around a spawned engine process.
//!
//! Built binaries follow the layout contract of the build system:
//! `<build_root>/<app_name>/<build_configuration>/<app_name>` (plus the
//! platform executable suffix on Windows). The handle resolves that path,
//! spawns the binary with the stored launch arguments, and later terminates
//! it while checking the engine did not already fail on its own.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, info};

use crate::config::EngineSection;
use crate::engine::readiness::{self, ReadyOutcome};
use crate::errors::{LaunchError, StopError};

/// An engine build plus the child process spawned from it.
///
/// `child` is `None` until [`start`](Self::start) succeeds and is released
/// by [`stop`](Self::stop); the handle owns the process exclusively.
#[derive(Debug)]
pub struct EngineProcess {
    app_name: String,
    build_configuration: String,
    build_root: PathBuf,
    launch_arguments: Vec<String>,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
}

impl EngineProcess {
    pub fn new(
        app_name: impl Into<String>,
        build_configuration: impl Into<String>,
        build_root: impl Into<PathBuf>,
        launch_arguments: Vec<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            build_configuration: build_configuration.into(),
            build_root: build_root.into(),
            launch_arguments,
            child: None,
            stdout: None,
        }
    }

    /// Build a handle straight from the `[engine]` config section.
    pub fn from_config(engine: &EngineSection) -> Self {
        Self::new(
            engine.app_name.clone(),
            engine.build_configuration.clone(),
            engine.build_root.clone(),
            engine.launch_arguments.clone(),
        )
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn build_configuration(&self) -> &str {
        &self.build_configuration
    }

    /// Absolute or root-relative path the engine binary is expected at.
    pub fn binary_path(&self) -> PathBuf {
        let file_name = format!("{}{}", self.app_name, std::env::consts::EXE_SUFFIX);
        self.build_root
            .join(&self.app_name)
            .join(&self.build_configuration)
            .join(file_name)
    }

    /// Spawn the engine binary with the stored launch arguments.
    ///
    /// Fails before spawning if the binary path does not point at a file;
    /// OS-level spawn failures propagate as [`LaunchError::Spawn`].
    pub fn start(&mut self) -> Result<(), LaunchError> {
        let path = self.binary_path();
        if !path.is_file() {
            return Err(LaunchError::MissingBinary(path));
        }

        info!(
            app = %self.app_name,
            config = %self.build_configuration,
            args = ?self.launch_arguments,
            "starting engine process"
        );

        let mut child = Command::new(&path)
            .args(&self.launch_arguments)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LaunchError::Spawn { path, source })?;

        // Always consume stderr so buffers don't fill; log at debug.
        if let Some(stderr) = child.stderr.take() {
            let app = self.app_name.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(app = %app, "stderr: {}", line);
                }
            });
        }

        self.stdout = child.stdout.take();
        self.child = Some(child);
        Ok(())
    }

    /// Wait until the engine prints a stdout line matching `pattern`.
    ///
    /// Bounded by `timeout`. If the engine exits before matching, the exit
    /// code surfaces as [`LaunchError::ExitedWhileWaiting`].
    pub async fn wait_ready(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<(), LaunchError> {
        let stdout = self
            .stdout
            .take()
            .ok_or_else(|| LaunchError::ExitedWhileWaiting(-1))?;

        match readiness::wait_for_ready_line(&self.app_name, stdout, pattern, timeout).await? {
            ReadyOutcome::Matched => {
                info!(app = %self.app_name, "engine reported ready");
                Ok(())
            }
            ReadyOutcome::StreamEnded => {
                // Stdout closed without a match; the engine is gone (or going).
                let code = match self.child.as_mut() {
                    Some(child) => child
                        .wait()
                        .await
                        .map(|status| status.code().unwrap_or(-1))
                        .unwrap_or(-1),
                    None => -1,
                };
                Err(LaunchError::ExitedWhileWaiting(code))
            }
        }
    }

    /// Hand remaining stdout to a background drain that logs lines at debug.
    ///
    /// Used when no ready pattern is configured, so the pipe never fills
    /// while the engine is kept alive.
    pub fn drain_stdout(&mut self) {
        if let Some(stdout) = self.stdout.take() {
            readiness::spawn_stdout_drain(&self.app_name, stdout);
        }
    }

    /// Terminate the engine and check it had not already failed.
    ///
    /// - Never started: [`StopError::NotStarted`].
    /// - Already exited with a nonzero code: [`StopError::ExitedEarly`].
    /// - Already exited zero: accepted as a clean run.
    /// - Still running: killed and reaped; an exit status caused by the
    ///   requested termination is never an error.
    pub async fn stop(&mut self) -> Result<(), StopError> {
        let mut child = self.child.take().ok_or(StopError::NotStarted)?;
        self.stdout = None;

        match child.try_wait()? {
            Some(status) if status.success() => {
                debug!(app = %self.app_name, "engine already exited cleanly");
                Ok(())
            }
            Some(status) => Err(StopError::ExitedEarly(status.code().unwrap_or(-1))),
            None => {
                info!(app = %self.app_name, "stopping engine process");
                child.start_kill()?;
                let status = child.wait().await?;
                debug!(
                    app = %self.app_name,
                    code = status.code().unwrap_or(-1),
                    "engine process reaped"
                );
                Ok(())
            }
        }
    }

    /// Whether `start()` has succeeded and `stop()` has not yet been called.
    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }
}

/// Resolve a binary path under `build_root` without constructing a handle.
pub fn binary_path_for(build_root: &Path, app_name: &str, build_configuration: &str) -> PathBuf {
    EngineProcess::new(app_name, build_configuration, build_root, Vec::new()).binary_path()
}
