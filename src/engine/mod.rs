// src/engine/mod.rs

//! Engine process lifecycle.
//!
//! - [`process`] owns the handle around a spawned engine binary
//!   (start / ready-wait / stop).
//! - [`readiness`] contains the stdout-scanning helpers used to detect that
//!   the engine has finished starting up.

pub mod process;
pub mod readiness;

pub use process::{binary_path_for, EngineProcess};
pub use readiness::ReadyOutcome;
