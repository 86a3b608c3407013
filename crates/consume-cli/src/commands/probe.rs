//! Probe command

use clap::Args;
use consume_clis::{ToolBinary, ToolCapabilityProbe, RUN_FLAG};
use std::path::PathBuf;

use crate::{config::Config, output::Output, CliError};

/// Report what an `evm` binary is and what it advertises
#[derive(Debug, Args)]
pub struct ProbeCommand {
    /// `evm` binary (defaults to the configured one)
    #[arg(long)]
    pub evm_bin: Option<PathBuf>,

    /// Check whether this fork name is advertised
    #[arg(long)]
    pub fork: Option<String>,
}

impl ProbeCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let evm_bin = self.evm_bin.unwrap_or_else(|| config.evm_bin.clone());
        let binary = ToolBinary::new(&evm_bin)?;
        let statetest = ToolCapabilityProbe::probe(&binary, "statetest")?;
        let blocktest = ToolCapabilityProbe::probe(&binary, "blocktest")?;

        let single_case = blocktest.supports(RUN_FLAG);
        let fork = self.fork.as_deref().map(|fork| {
            (
                fork,
                statetest.supports_fork(fork) || blocktest.supports_fork(fork),
            )
        });

        let mut lines = vec![
            format!("Binary:      {}", binary.path().display()),
            format!("Version:     {}", binary.version().unwrap_or("unknown")),
            format!("Detected:    {}", binary.is_detected()),
            format!("Single case: {}", single_case),
        ];
        let mut output = Output::new(json)
            .field("binary", &binary.path().to_string_lossy())
            .field_opt("version", binary.version())
            .field_bool("detected", binary.is_detected())
            .field_bool("single_case", single_case);
        if let Some((name, supported)) = fork {
            lines.push(format!("Fork {}: {}", name, supported));
            output = output.field("fork", name).field_bool("fork_supported", supported);
        }

        output.message(&lines.join("\n")).print();
        Ok(())
    }
}
