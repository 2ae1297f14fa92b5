// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `enginectl`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "enginectl",
    version,
    about = "Launch engine builds and drive the asset compiler.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the harness config file (TOML).
    ///
    /// Default: `Enginectl.toml` in the current working directory. A missing
    /// default file is fine; built-in defaults apply.
    #[arg(long, value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ENGINECTL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Launch an engine build, keep it alive briefly, then stop it.
    Run(RunArgs),

    /// Invoke the asset compiler on an asset directory.
    CompileAssets(CompileAssetsArgs),
}

/// Arguments for `enginectl run`.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Name of the app to launch (e.g. `editor`, `game`).
    #[arg(long, value_name = "NAME")]
    pub app_name: Option<String>,

    /// Build configuration to launch (e.g. `Debug`, `Release`).
    #[arg(long, value_name = "CONFIG")]
    pub config: Option<String>,

    /// Root directory containing built apps.
    ///
    /// Binaries are expected at `<build-root>/<app>/<config>/<app>`.
    #[arg(long, value_name = "DIR")]
    pub build_root: Option<PathBuf>,

    /// How long to keep the engine alive before stopping it (e.g. `5s`).
    ///
    /// Ignored when a ready pattern is in effect.
    #[arg(long, value_name = "DURATION")]
    pub run_for: Option<String>,

    /// Regex matched against engine stdout lines; the engine counts as
    /// started once a line matches.
    #[arg(long, value_name = "REGEX")]
    pub ready_pattern: Option<String>,

    /// Upper bound on waiting for the ready pattern (e.g. `30s`).
    #[arg(long, value_name = "DURATION")]
    pub ready_timeout: Option<String>,

    /// Arguments passed through verbatim to the engine binary.
    #[arg(last = true, value_name = "ARGS")]
    pub engine_args: Vec<String>,
}

/// Arguments for `enginectl compile-assets`.
#[derive(Debug, Clone, Args)]
pub struct CompileAssetsArgs {
    /// Root directory of the assets to compile.
    #[arg(short, long, value_name = "PATH")]
    pub path: PathBuf,

    /// Forward `--verbose=1` to the compiler.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the asset compiler executable.
    #[arg(short, long, value_name = "PATH")]
    pub compiler: PathBuf,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults_leave_overrides_unset() {
        let args = CliArgs::parse_from(["enginectl", "run"]);
        match args.command {
            Command::Run(run) => {
                assert!(run.app_name.is_none());
                assert!(run.config.is_none());
                assert!(run.engine_args.is_empty());
            }
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn engine_args_pass_through_after_double_dash() {
        let args =
            CliArgs::parse_from(["enginectl", "run", "--app-name", "game", "--", "--verbose=1"]);
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.app_name.as_deref(), Some("game"));
                assert_eq!(run.engine_args, vec!["--verbose=1".to_string()]);
            }
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn compile_assets_short_flags() {
        let args = CliArgs::parse_from([
            "enginectl",
            "compile-assets",
            "-p",
            "/assets",
            "-v",
            "-c",
            "/bin/ac",
        ]);
        match args.command {
            Command::CompileAssets(c) => {
                assert_eq!(c.path, PathBuf::from("/assets"));
                assert!(c.verbose);
                assert_eq!(c.compiler, PathBuf::from("/bin/ac"));
            }
            _ => panic!("expected compile-assets subcommand"),
        }
    }
}
