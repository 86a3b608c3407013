//! `blocktest` runner

use crate::debug_dump::{with_bundle, DebugBundle};
use crate::process::run_command;
use crate::tool::{ConsumerTool, ToolBinary, ToolCapabilityProbe};
use consume_fixtures::ConsumeResult;
use std::path::Path;
use std::sync::Arc;

/// Flag that restricts a `blocktest` run to one case
pub const RUN_FLAG: &str = "--run";

/// Runs chain-test fixtures through `<binary> blocktest`.
///
/// `blocktest` prints no structured per-case output, so the verdict is the
/// exit code alone.
#[derive(Debug, Clone)]
pub struct BlockTestRunner {
    binary: Arc<ToolBinary>,
    probe: ToolCapabilityProbe,
}

impl BlockTestRunner {
    /// Create a runner, probing `blocktest --help` once
    pub fn new(binary: Arc<ToolBinary>) -> ConsumeResult<Self> {
        let probe = ToolCapabilityProbe::probe(&binary, Self::SUBCOMMAND)?;
        Ok(Self { binary, probe })
    }

    /// Whether the binary advertises running a single named case
    pub fn supports_single_case(&self) -> bool {
        self.supports(RUN_FLAG)
    }

    /// Command line for one fixture file.
    ///
    /// `--run` takes a regular expression, so the case name is escaped and
    /// anchored to match itself only. The filter is dropped silently when
    /// the binary does not advertise it; the whole file then runs as a unit.
    pub fn build_command(
        &self,
        fixture_path: &Path,
        fixture_name: Option<&str>,
        debug: bool,
    ) -> Vec<String> {
        let mut command = self.binary.base_command(debug);
        command.push(Self::SUBCOMMAND.to_string());
        if let Some(name) = fixture_name {
            if self.supports_single_case() {
                command.push(RUN_FLAG.to_string());
                command.push(case_pattern(name));
            } else {
                tracing::debug!(case = name, "blocktest has no --run; running whole file");
            }
        }
        command.push(fixture_path.to_string_lossy().into_owned());
        command
    }

    /// Consume a chain-test fixture file (or one case of it).
    ///
    /// Succeeds with no output on exit 0; fails with an invocation error
    /// otherwise. When `debug_dir` is set a bundle is written as well; a
    /// bundle write error is returned only when the run itself succeeded.
    pub fn consume(
        &self,
        fixture_path: &Path,
        fixture_name: Option<&str>,
        debug_dir: Option<&Path>,
    ) -> ConsumeResult<()> {
        let command = self.build_command(fixture_path, fixture_name, debug_dir.is_some());
        let result = run_command(&command)?;
        let bundle = debug_dir.map(|dir| DebugBundle::write(dir, &result, fixture_path));
        with_bundle(result.check_success().map(|_| ()), bundle)
    }
}

/// `--run` pattern matching exactly `name`
fn case_pattern(name: &str) -> String {
    format!("^{}$", regex::escape(name))
}

impl ConsumerTool for BlockTestRunner {
    const SUBCOMMAND: &'static str = "blocktest";

    fn binary(&self) -> &ToolBinary {
        &self.binary
    }

    fn probe(&self) -> &ToolCapabilityProbe {
        &self.probe
    }
}
