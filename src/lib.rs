// src/lib.rs

pub mod assets;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::info;

use crate::assets::CompileRequest;
use crate::cli::{CliArgs, Command, CompileAssetsArgs, RunArgs};
use crate::config::{parse_duration, resolve_config, EngineSection, HarnessConfig};
use crate::engine::EngineProcess;

/// High-level entry point used by `main.rs`.
///
/// Resolves the harness config, applies CLI overrides, and dispatches to the
/// subcommand. Returns the process exit code for `main` to use.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = resolve_config(args.config_file.as_deref())?;

    match args.command {
        Command::Run(run_args) => {
            run_engine(&cfg, &run_args).await?;
            Ok(0)
        }
        Command::CompileAssets(compile_args) => compile_assets(&compile_args).await,
    }
}

/// Launch the configured engine build, keep it alive until it is considered
/// started, then stop it and check it did not fail on its own.
async fn run_engine(cfg: &HarnessConfig, args: &RunArgs) -> Result<()> {
    let engine_section = merge_engine_overrides(&cfg.engine, args);
    let startup = StartupPlan::from_config_and_args(cfg, args)?;

    let mut engine = EngineProcess::from_config(&engine_section);
    info!(
        app = %engine.app_name(),
        config = %engine.build_configuration(),
        binary = %engine.binary_path().display(),
        "launching engine"
    );

    engine.start()?;

    match startup {
        StartupPlan::ReadyPattern { pattern, timeout } => {
            engine.wait_ready(&pattern, timeout).await?;
        }
        StartupPlan::FixedDelay(run_for) => {
            engine.drain_stdout();
            info!(?run_for, "no ready pattern; keeping engine alive for fixed duration");
            tokio::time::sleep(run_for).await;
        }
    }

    engine.stop().await?;
    info!("engine started and stopped cleanly");
    Ok(())
}

/// Invoke the asset compiler and print the fixed result line.
///
/// The compiler's failure code becomes our own exit code.
async fn compile_assets(args: &CompileAssetsArgs) -> Result<i32> {
    let request = CompileRequest {
        compiler: args.compiler.clone(),
        path: args.path.clone(),
        verbose: args.verbose,
    };

    let outcome = request.run().await?;
    println!("{}", outcome.message());
    Ok(outcome.exit_code())
}

/// How `run` decides the engine has started.
enum StartupPlan {
    ReadyPattern { pattern: Regex, timeout: Duration },
    FixedDelay(Duration),
}

impl StartupPlan {
    fn from_config_and_args(cfg: &HarnessConfig, args: &RunArgs) -> Result<Self> {
        let pattern_str = args
            .ready_pattern
            .clone()
            .or_else(|| cfg.startup.ready_pattern.clone());

        match pattern_str {
            Some(p) => {
                let pattern = Regex::new(&p)
                    .with_context(|| format!("invalid ready pattern '{}'", p))?;
                let timeout_str = args.ready_timeout.as_deref().unwrap_or(&cfg.startup.timeout);
                let timeout = parse_duration(timeout_str)
                    .map_err(|e| anyhow!(e))
                    .context("invalid ready timeout")?;
                Ok(StartupPlan::ReadyPattern { pattern, timeout })
            }
            None => {
                let run_for_str = args.run_for.as_deref().unwrap_or(&cfg.startup.run_for);
                let run_for = parse_duration(run_for_str)
                    .map_err(|e| anyhow!(e))
                    .context("invalid run-for duration")?;
                Ok(StartupPlan::FixedDelay(run_for))
            }
        }
    }
}

/// CLI flags win over the config file; engine args after `--` replace the
/// configured launch arguments when present.
fn merge_engine_overrides(base: &EngineSection, args: &RunArgs) -> EngineSection {
    let mut merged = base.clone();
    if let Some(ref app_name) = args.app_name {
        merged.app_name = app_name.clone();
    }
    if let Some(ref config) = args.config {
        merged.build_configuration = config.clone();
    }
    if let Some(ref build_root) = args.build_root {
        merged.build_root = build_root.clone();
    }
    if !args.engine_args.is_empty() {
        merged.launch_arguments = args.engine_args.clone();
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_run_args() -> RunArgs {
        RunArgs {
            app_name: None,
            config: None,
            build_root: None,
            run_for: None,
            ready_pattern: None,
            ready_timeout: None,
            engine_args: Vec::new(),
        }
    }

    #[test]
    fn no_overrides_keeps_editor_debug_defaults() {
        let merged = merge_engine_overrides(&EngineSection::default(), &empty_run_args());
        assert_eq!(merged.app_name, "editor");
        assert_eq!(merged.build_configuration, "Debug");
    }

    #[test]
    fn cli_flags_win_over_config() {
        let mut args = empty_run_args();
        args.app_name = Some("game".to_string());
        args.config = Some("Release".to_string());
        args.engine_args = vec!["--verbose=1".to_string()];

        let merged = merge_engine_overrides(&EngineSection::default(), &args);
        assert_eq!(merged.app_name, "game");
        assert_eq!(merged.build_configuration, "Release");
        assert_eq!(merged.launch_arguments, vec!["--verbose=1"]);
    }

    #[test]
    fn startup_plan_defaults_to_five_second_delay() {
        let plan =
            StartupPlan::from_config_and_args(&HarnessConfig::default(), &empty_run_args())
                .unwrap();
        match plan {
            StartupPlan::FixedDelay(d) => assert_eq!(d, Duration::from_secs(5)),
            _ => panic!("expected fixed delay"),
        }
    }

    #[test]
    fn ready_pattern_flag_selects_bounded_wait() {
        let mut args = empty_run_args();
        args.ready_pattern = Some("^ready$".to_string());
        args.ready_timeout = Some("2s".to_string());

        let plan = StartupPlan::from_config_and_args(&HarnessConfig::default(), &args).unwrap();
        match plan {
            StartupPlan::ReadyPattern { pattern, timeout } => {
                assert!(pattern.is_match("ready"));
                assert_eq!(timeout, Duration::from_secs(2));
            }
            _ => panic!("expected ready-pattern plan"),
        }
    }

    #[test]
    fn invalid_ready_pattern_is_rejected() {
        let mut args = empty_run_args();
        args.ready_pattern = Some("(unclosed".to_string());
        assert!(StartupPlan::from_config_and_args(&HarnessConfig::default(), &args).is_err());
    }
}
