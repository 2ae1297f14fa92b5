// src/errors.rs

//! Crate-wide error types.
//!
//! The process seam gets structured errors so callers (and tests) can tell a
//! missing binary from an engine that crashed on its own; everything above
//! that layer uses `anyhow` with context.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to get an engine process off the ground.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("engine binary not found at {0}")]
    MissingBinary(PathBuf),

    #[error("spawning engine binary {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("engine did not report ready within {0:?}")]
    ReadyTimeout(std::time::Duration),

    #[error("engine exited with code {0} while waiting for ready")]
    ExitedWhileWaiting(i32),
}

/// Failure to stop a started engine process cleanly.
#[derive(Error, Debug)]
pub enum StopError {
    #[error("stop() called but the engine was never started")]
    NotStarted,

    #[error("engine already exited with code {0} before stop was requested")]
    ExitedEarly(i32),

    #[error("waiting for engine to exit: {0}")]
    Wait(#[from] std::io::Error),
}

pub use anyhow::{Error, Result};
