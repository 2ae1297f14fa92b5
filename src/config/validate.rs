// src/config/validate.rs

use anyhow::{anyhow, Context, Result};
use regex::Regex;

use crate::config::model::{parse_duration, HarnessConfig};

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `app_name` and `build_configuration` are nonempty
/// - `startup.timeout` and `startup.run_for` parse as durations
/// - `startup.ready_pattern`, if set, compiles as a regex
pub fn validate_config(cfg: &HarnessConfig) -> Result<()> {
    validate_engine_section(cfg)?;
    validate_startup_section(cfg)?;
    Ok(())
}

fn validate_engine_section(cfg: &HarnessConfig) -> Result<()> {
    if cfg.engine.app_name.trim().is_empty() {
        return Err(anyhow!("[engine].app_name must not be empty"));
    }
    if cfg.engine.build_configuration.trim().is_empty() {
        return Err(anyhow!("[engine].build_configuration must not be empty"));
    }
    Ok(())
}

fn validate_startup_section(cfg: &HarnessConfig) -> Result<()> {
    parse_duration(&cfg.startup.timeout)
        .map_err(|e| anyhow!(e))
        .context("invalid [startup].timeout")?;

    parse_duration(&cfg.startup.run_for)
        .map_err(|e| anyhow!(e))
        .context("invalid [startup].run_for")?;

    if let Some(ref pattern) = cfg.startup.ready_pattern {
        Regex::new(pattern)
            .with_context(|| format!("invalid [startup].ready_pattern '{}'", pattern))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&HarnessConfig::default()).is_ok());
    }

    #[test]
    fn empty_app_name_is_rejected() {
        let mut cfg = HarnessConfig::default();
        cfg.engine.app_name = "  ".to_string();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn bad_ready_pattern_is_rejected() {
        let mut cfg = HarnessConfig::default();
        cfg.startup.ready_pattern = Some("(unclosed".to_string());
        assert!(validate_config(&cfg).is_err());
    }
}
