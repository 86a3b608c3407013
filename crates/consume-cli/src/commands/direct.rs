//! Direct command: consume fixtures with an `evm` binary

use clap::Args;
use consume_clis::clis::geth::GethFixtureConsumer;
use consume_clis::BinaryRoles;
use consume_fixtures::{debug_dump_dir, FixtureConsumer, FixtureFormat, Fixtures};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::stats::ConsumeStats;
use crate::{config::Config, output::Output, CliError};

/// Run fixture files through `evm statetest` / `evm blocktest`
#[derive(Debug, Args)]
pub struct DirectCommand {
    /// `evm` binary (defaults to the configured one)
    #[arg(long)]
    pub evm_bin: Option<PathBuf>,

    /// Write a debug bundle per invocation under this directory
    #[arg(long)]
    pub dump_dir: Option<PathBuf>,

    /// Fixture format (state_test, blockchain_test, eof_test); detected when omitted
    #[arg(long)]
    pub format: Option<FixtureFormat>,

    /// Run chain tests one case at a time when the binary supports it
    #[arg(long)]
    pub single_case: bool,

    /// Fixture files or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

impl DirectCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let evm_bin = self.evm_bin.clone().unwrap_or_else(|| config.evm_bin.clone());
        let dump_dir = self.dump_dir.clone().or_else(|| config.dump_dir.clone());
        let consumer = GethFixtureConsumer::new(&BinaryRoles::single(evm_bin))?;

        let files = collect_fixture_files(&self.inputs)?;
        tracing::info!(files = files.len(), "consuming fixture files");

        let start = Instant::now();
        let mut stats = ConsumeStats::new();
        for path in &files {
            self.consume_file(&consumer, path, dump_dir.as_deref(), &mut stats);
        }
        stats.duration = start.elapsed();

        Output::new(json)
            .field_value("stats", &stats)
            .message(&stats.summary())
            .print();

        if stats.has_failures() {
            return Err(CliError::Failures {
                failed: stats.failed,
                errors: stats.errors,
            });
        }
        Ok(())
    }

    fn consume_file(
        &self,
        consumer: &GethFixtureConsumer,
        path: &Path,
        dump_dir: Option<&Path>,
        stats: &mut ConsumeStats,
    ) {
        let label = path.display().to_string();
        let fixtures = match Fixtures::load(path) {
            Ok(fixtures) => fixtures,
            Err(e) => {
                stats.add_error(&label, &e, consumer.mapper());
                return;
            }
        };

        let Some(format) = self.format.or_else(|| fixtures.detect_format()) else {
            tracing::warn!(file = %label, "cannot detect fixture format; skipping");
            stats.add_skipped();
            return;
        };
        if !consumer.is_consumable(format) {
            tracing::warn!(file = %label, %format, "no binary for fixture format; skipping");
            stats.add_skipped();
            return;
        }

        let single_case = format == FixtureFormat::BlockchainTest
            && self.single_case
            && consumer.run_single_case();
        if !single_case {
            let debug_dir = dump_dir.map(|base| debug_dump_dir(base, path, None, false));
            match consumer.consume_fixture(format, path, None, debug_dir.as_deref()) {
                Ok(outcome) => stats.add_outcome(&label, &outcome, consumer.mapper()),
                Err(e) => stats.add_error(&label, &e, consumer.mapper()),
            }
            return;
        }

        for name in fixtures.names() {
            let case_label = format!("{}::{}", label, name);
            let debug_dir = dump_dir.map(|base| debug_dump_dir(base, path, Some(name), true));
            match consumer.consume_fixture(format, path, Some(name), debug_dir.as_deref()) {
                Ok(outcome) => stats.add_outcome(&case_label, &outcome, consumer.mapper()),
                Err(e) => stats.add_error(&case_label, &e, consumer.mapper()),
            }
        }
    }
}

/// Expand inputs into fixture files: files as given, directories walked
/// recursively for `*.json` in sorted order
pub fn collect_fixture_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            collect_recursive(input, &mut files)?;
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(CliError::MissingInput(input.clone()));
        }
    }
    Ok(files)
}

fn collect_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CliError> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_recursive(&path, files)?;
        } else if path.extension().is_some_and(|e| e == "json") {
            files.push(path);
        }
    }
    Ok(())
}
