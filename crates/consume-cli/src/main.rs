//! # consume-cli
//!
//! Consumes test fixtures with an external client binary.
//!
//! ## Usage
//!
//! ```bash
//! # Run fixture files or directories through geth's evm
//! consume direct --evm-bin /opt/geth/evm fixtures/state_tests
//! consume direct --evm-bin evm --single-case --dump-dir /tmp/dump fixtures/blockchain_tests
//!
//! # Map client error text onto the canonical taxonomy
//! consume classify "intrinsic gas too low: have 21000, want 53000"
//!
//! # Inspect a binary
//! consume probe --evm-bin evm --fork Prague
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;
mod stats;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Fixture consumption CLI
#[derive(Parser, Debug)]
#[command(name = "consume")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Consume fixtures by invoking the client binary directly
    Direct(commands::direct::DirectCommand),
    /// Classify client error text
    Classify(commands::classify::ClassifyCommand),
    /// Probe a client binary's version and capabilities
    Probe(commands::probe::ProbeCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the default evm binary
        #[arg(long)]
        set_evm_bin: Option<std::path::PathBuf>,
        /// Set the default debug dump directory
        #[arg(long)]
        set_dump_dir: Option<std::path::PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(()) => {}
        Err(e) if matches!(e.downcast_ref::<CliError>(), Some(CliError::Failures { .. })) => {
            std::process::exit(1);
        }
        Err(e) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "error": format!("{:#}", e),
                        "success": false
                    })
                );
            } else {
                eprintln!("Error: {:#}", e);
            }
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load();
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(log_level)?;

    match cli.command {
        Commands::Direct(cmd) => cmd.execute(&config, cli.json)?,
        Commands::Classify(cmd) => cmd.execute(cli.json)?,
        Commands::Probe(cmd) => cmd.execute(&config, cli.json)?,
        Commands::Config {
            show,
            set_evm_bin,
            set_dump_dir,
        } => handle_config(&mut config, show, set_evm_bin, set_dump_dir, cli.json)?,
    }
    Ok(())
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .with_context(|| format!("invalid log level `{}`", log_level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("failed to initialize logging")
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_evm_bin: Option<std::path::PathBuf>,
    set_dump_dir: Option<std::path::PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let mut modified = false;

    if let Some(evm_bin) = set_evm_bin {
        config.evm_bin = evm_bin;
        modified = true;
    }

    if let Some(dump_dir) = set_dump_dir {
        config.dump_dir = Some(dump_dir);
        modified = true;
    }

    if modified {
        let path = config.save().context("failed to save configuration")?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.to_string_lossy())
            .message(&format!("Configuration saved to {}", path.display()))
            .print();
    } else if show {
        let dump_dir = config
            .dump_dir
            .as_ref()
            .map(|d| d.to_string_lossy().into_owned());
        Output::new(json)
            .field("evm_bin", &config.evm_bin.to_string_lossy())
            .field_opt("dump_dir", dump_dir.as_deref())
            .field("log_level", &config.log_level)
            .message(&format!(
                "evm binary: {}\nDump dir:   {}\nLog level:  {}",
                config.evm_bin.display(),
                dump_dir.as_deref().unwrap_or("(none)"),
                config.log_level
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-evm-bin/--set-dump-dir to modify")
            .print();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_direct() {
        let cli = Cli::try_parse_from([
            "consume",
            "--json",
            "direct",
            "--evm-bin",
            "/opt/evm",
            "--format",
            "blockchain_test",
            "--single-case",
            "a.json",
            "dir",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Direct(cmd) => {
                assert_eq!(cmd.evm_bin, Some(PathBuf::from("/opt/evm")));
                assert_eq!(cmd.format, Some(consume_fixtures::FixtureFormat::BlockchainTest));
                assert!(cmd.single_case);
                assert_eq!(cmd.inputs, vec![PathBuf::from("a.json"), PathBuf::from("dir")]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_direct_requires_input() {
        assert!(Cli::try_parse_from(["consume", "direct"]).is_err());
    }

    #[test]
    fn test_direct_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["consume", "direct", "--format", "vm_test", "a.json"]).is_err());
    }
}
