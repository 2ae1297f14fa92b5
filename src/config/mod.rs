// src/config/mod.rs

//! Configuration loading and validation for enginectl.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate names, durations, and the ready regex (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, resolve_config};
pub use model::{parse_duration, EngineSection, HarnessConfig, StartupSection};
pub use validate::validate_config;
