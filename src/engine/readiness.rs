// src/engine/readiness.rs

//! Readiness detection on engine stdout.
//!
//! The engine gives no structured startup handshake; the closest signal is a
//! log line. `wait_for_ready_line` scans stdout for a configured pattern,
//! bounded by a timeout, which replaces launching blind and sleeping a fixed
//! number of seconds.

use std::time::Duration;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::ChildStdout;
use tracing::debug;

use crate::errors::LaunchError;

/// How a bounded ready-wait ended (other than by timing out).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyOutcome {
    /// A stdout line matched the ready pattern.
    Matched,
    /// Stdout closed before any line matched; the process has exited.
    StreamEnded,
}

/// Scan `stdout` line by line until `pattern` matches, bounded by `timeout`.
///
/// On a match the remaining stdout is handed to a background drain so OS
/// pipe buffers never fill. A timeout surfaces as
/// [`LaunchError::ReadyTimeout`].
pub async fn wait_for_ready_line(
    app_name: &str,
    stdout: ChildStdout,
    pattern: &Regex,
    timeout: Duration,
) -> Result<ReadyOutcome, LaunchError> {
    let mut lines = BufReader::new(stdout).lines();

    let scan = async {
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(app = %app_name, "stdout: {}", line);
            if pattern.is_match(&line) {
                return ReadyOutcome::Matched;
            }
        }
        ReadyOutcome::StreamEnded
    };

    match tokio::time::timeout(timeout, scan).await {
        Ok(ReadyOutcome::Matched) => {
            spawn_lines_drain(app_name, lines);
            Ok(ReadyOutcome::Matched)
        }
        Ok(ReadyOutcome::StreamEnded) => Ok(ReadyOutcome::StreamEnded),
        Err(_) => Err(LaunchError::ReadyTimeout(timeout)),
    }
}

/// Consume stdout in the background, logging lines at debug.
pub fn spawn_stdout_drain(app_name: &str, stdout: ChildStdout) {
    spawn_lines_drain(app_name, BufReader::new(stdout).lines());
}

fn spawn_lines_drain(app_name: &str, mut lines: Lines<BufReader<ChildStdout>>) {
    let app = app_name.to_string();
    tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(app = %app, "stdout: {}", line);
        }
        debug!(app = %app, "stdout drain ended");
    });
}
