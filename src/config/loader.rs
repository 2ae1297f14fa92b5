// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::model::HarnessConfig;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the raw
/// `HarnessConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (durations, regexes). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<HarnessConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: HarnessConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks app/configuration names, duration strings, and the ready regex.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<HarnessConfig> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Resolve the effective configuration given an optional explicit path.
///
/// - Explicit path: must load (missing file is an error).
/// - No path: try `Enginectl.toml` in the current directory; if absent, fall
///   back to built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<HarnessConfig> {
    match explicit {
        Some(path) => load_and_validate(path),
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_and_validate(&path)
            } else {
                Ok(HarnessConfig::default())
            }
        }
    }
}

/// Default config path: `Enginectl.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Enginectl.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_explicit_path_is_an_error() {
        let result = resolve_config(Some(Path::new("/nonexistent/Enginectl.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn explicit_file_loads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Enginectl.toml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "[engine]\napp_name = \"game\"").unwrap();

        let cfg = resolve_config(Some(&path)).unwrap();
        assert_eq!(cfg.engine.app_name, "game");
        assert_eq!(cfg.engine.build_configuration, "Debug");
    }

    #[test]
    fn invalid_duration_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Enginectl.toml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "[startup]\nrun_for = \"soon\"").unwrap();

        assert!(resolve_config(Some(&path)).is_err());
    }
}
