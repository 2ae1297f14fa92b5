// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level harness configuration as read from a TOML file.
///
/// ```toml
/// [engine]
/// app_name = "editor"
/// build_configuration = "Debug"
/// launch_arguments = ["--verbose=1"]
///
/// [startup]
/// ready_pattern = "^engine ready"
/// timeout = "30s"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HarnessConfig {
    /// Which engine build to launch, from `[engine]`.
    #[serde(default)]
    pub engine: EngineSection,

    /// Startup/readiness behaviour, from `[startup]`.
    #[serde(default)]
    pub startup: StartupSection,
}

/// `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    /// App to launch. Binaries live under
    /// `<build_root>/<app_name>/<build_configuration>/<app_name>`.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Build configuration, e.g. `"Debug"` or `"Release"`.
    #[serde(default = "default_build_configuration")]
    pub build_configuration: String,

    /// Root directory containing the built apps.
    #[serde(default = "default_build_root")]
    pub build_root: PathBuf,

    /// Arguments passed through verbatim to the engine binary.
    #[serde(default)]
    pub launch_arguments: Vec<String>,
}

fn default_app_name() -> String {
    "editor".to_string()
}

fn default_build_configuration() -> String {
    "Debug".to_string()
}

fn default_build_root() -> PathBuf {
    PathBuf::from("_build/apps")
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            build_configuration: default_build_configuration(),
            build_root: default_build_root(),
            launch_arguments: Vec::new(),
        }
    }
}

/// `[startup]` section.
///
/// If `ready_pattern` is set, `run` waits (bounded by `timeout`) for a
/// stdout line matching it. Otherwise the engine is simply kept alive for
/// `run_for` before being stopped.
#[derive(Debug, Clone, Deserialize)]
pub struct StartupSection {
    /// Regex matched against engine stdout lines.
    #[serde(default)]
    pub ready_pattern: Option<String>,

    /// Bound on waiting for `ready_pattern`, e.g. `"30s"`.
    #[serde(default = "default_ready_timeout")]
    pub timeout: String,

    /// Fixed keep-alive duration when no ready pattern is configured.
    #[serde(default = "default_run_for")]
    pub run_for: String,
}

fn default_ready_timeout() -> String {
    "30s".to_string()
}

fn default_run_for() -> String {
    "5s".to_string()
}

impl Default for StartupSection {
    fn default() -> Self {
        Self {
            ready_pattern: None,
            timeout: default_ready_timeout(),
            run_for: default_run_for(),
        }
    }
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_to_editor_debug() {
        let cfg = HarnessConfig::default();
        assert_eq!(cfg.engine.app_name, "editor");
        assert_eq!(cfg.engine.build_configuration, "Debug");
        assert_eq!(cfg.engine.build_root, PathBuf::from("_build/apps"));
        assert!(cfg.engine.launch_arguments.is_empty());
    }

    #[test]
    fn empty_toml_matches_defaults() {
        let cfg: HarnessConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.engine.app_name, "editor");
        assert_eq!(cfg.engine.build_configuration, "Debug");
        assert!(cfg.startup.ready_pattern.is_none());
        assert_eq!(cfg.startup.run_for, "5s");
    }

    #[test]
    fn partial_engine_section_keeps_other_defaults() {
        let cfg: HarnessConfig = toml::from_str(
            r#"
            [engine]
            app_name = "game"
            launch_arguments = ["--verbose=1"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.engine.app_name, "game");
        assert_eq!(cfg.engine.build_configuration, "Debug");
        assert_eq!(cfg.engine.launch_arguments, vec!["--verbose=1"]);
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("abc").is_err());
    }
}
