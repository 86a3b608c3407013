//! `statetest` runner

use crate::debug_dump::{with_bundle, DebugBundle};
use crate::process::{run_command, InvocationResult};
use crate::tool::{ConsumerTool, ToolBinary, ToolCapabilityProbe};
use consume_fixtures::{ConsumeError, ConsumeResult};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Runs state-test fixtures through `<binary> statetest`
#[derive(Debug, Clone)]
pub struct StateTestRunner {
    binary: Arc<ToolBinary>,
    probe: ToolCapabilityProbe,
}

impl StateTestRunner {
    /// Create a runner, probing `statetest --help` once
    pub fn new(binary: Arc<ToolBinary>) -> ConsumeResult<Self> {
        let probe = ToolCapabilityProbe::probe(&binary, Self::SUBCOMMAND)?;
        Ok(Self { binary, probe })
    }

    /// Command line for one fixture file
    pub fn build_command(&self, fixture_path: &Path, debug: bool) -> Vec<String> {
        let mut command = self.binary.base_command(debug);
        command.push(Self::SUBCOMMAND.to_string());
        command.push(fixture_path.to_string_lossy().into_owned());
        command
    }

    /// Consume a state-test fixture file.
    ///
    /// Returns the per-case records exactly as printed. Fails with an
    /// invocation error on nonzero exit and a result-parse error when
    /// stdout is not a JSON array. When `debug_dir` is set a bundle is
    /// written as well; a bundle write error is returned only when the run
    /// itself succeeded.
    pub fn consume(&self, fixture_path: &Path, debug_dir: Option<&Path>) -> ConsumeResult<Vec<Value>> {
        let command = self.build_command(fixture_path, debug_dir.is_some());
        let result = run_command(&command)?;
        let bundle = debug_dir.map(|dir| DebugBundle::write(dir, &result, fixture_path));
        with_bundle(parse_cases(result), bundle)
    }
}

fn parse_cases(result: InvocationResult) -> ConsumeResult<Vec<Value>> {
    let result = result.check_success()?;
    let stdout = result.stdout_text();
    let parsed: Value = serde_json::from_str(&stdout).map_err(|e| ConsumeError::ResultParse {
        command: result.command_line(),
        detail: format!("stdout is not valid JSON: {}", e),
        stdout: stdout.clone(),
    })?;

    match parsed {
        Value::Array(cases) => {
            tracing::debug!(cases = cases.len(), "statetest finished");
            Ok(cases)
        }
        other => Err(ConsumeError::ResultParse {
            command: result.command_line(),
            detail: format!("expected a JSON array, got {}", json_kind(&other)),
            stdout,
        }),
    }
}

impl ConsumerTool for StateTestRunner {
    const SUBCOMMAND: &'static str = "statetest";

    fn binary(&self) -> &ToolBinary {
        &self.binary
    }

    fn probe(&self) -> &ToolCapabilityProbe {
        &self.probe
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
