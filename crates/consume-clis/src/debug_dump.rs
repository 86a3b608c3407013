//! Reproduction bundles for single invocations

use crate::process::InvocationResult;
use consume_fixtures::ConsumeResult;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Argv as a JSON array
pub const ARGS_FILE: &str = "consume_direct_args.json";
/// Exit code as text
pub const RETURNCODE_FILE: &str = "consume_direct_returncode.txt";
/// Raw standard output
pub const STDOUT_FILE: &str = "consume_direct_stdout.txt";
/// Raw standard error
pub const STDERR_FILE: &str = "consume_direct_stderr.txt";
/// Executable reproduction script
pub const SCRIPT_FILE: &str = "consume_direct.sh";
/// Byte-identical copy of the consumed fixture
pub const DEBUG_FIXTURE_FILE: &str = "fixtures.json";

/// A written reproduction bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugBundle {
    dir: PathBuf,
}

impl DebugBundle {
    /// Write the bundle for `result` into `dir`.
    ///
    /// `fixture_path` must name a real file; in-memory fixtures are
    /// materialized by the caller before invocation. The fixture's argument
    /// is assumed to be the last element of the command.
    pub fn write(dir: &Path, result: &InvocationResult, fixture_path: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let bundle = Self {
            dir: dir.to_path_buf(),
        };

        let args = serde_json::to_string_pretty(&result.command)?;
        fs::write(bundle.args(), args)?;
        fs::write(bundle.returncode(), returncode_text(result.exit_code))?;
        fs::write(bundle.stdout(), &result.stdout)?;
        fs::write(bundle.stderr(), &result.stderr)?;
        fs::copy(fixture_path, bundle.fixture())?;
        write_script(&bundle.script(), &repro_script(&result.command, &bundle.fixture()))?;

        tracing::info!(dir = %dir.display(), "wrote debug bundle");
        Ok(bundle)
    }

    /// Bundle directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the argv record
    pub fn args(&self) -> PathBuf {
        self.dir.join(ARGS_FILE)
    }

    /// Path of the exit-code file
    pub fn returncode(&self) -> PathBuf {
        self.dir.join(RETURNCODE_FILE)
    }

    /// Path of the captured stdout
    pub fn stdout(&self) -> PathBuf {
        self.dir.join(STDOUT_FILE)
    }

    /// Path of the captured stderr
    pub fn stderr(&self) -> PathBuf {
        self.dir.join(STDERR_FILE)
    }

    /// Path of the reproduction script
    pub fn script(&self) -> PathBuf {
        self.dir.join(SCRIPT_FILE)
    }

    /// Path of the fixture copy
    pub fn fixture(&self) -> PathBuf {
        self.dir.join(DEBUG_FIXTURE_FILE)
    }
}

/// Settle a run's verdict against the outcome of writing its bundle.
///
/// A failed verdict wins and a bundle error alongside it is only logged.
pub(crate) fn with_bundle<T>(
    verdict: ConsumeResult<T>,
    bundle: Option<io::Result<DebugBundle>>,
) -> ConsumeResult<T> {
    match (verdict, bundle) {
        (Ok(_), Some(Err(e))) => Err(e.into()),
        (Err(err), Some(Err(e))) => {
            tracing::warn!(error = %e, "failed to write debug bundle");
            Err(err)
        }
        (verdict, _) => verdict,
    }
}

fn returncode_text(code: Option<i32>) -> String {
    code.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string())
}

/// The recorded command with the fixture argument pointed at the copy
fn repro_script(command: &[String], debug_fixture: &Path) -> String {
    let mut args: Vec<String> = command
        .split_last()
        .map(|(_, rest)| rest.iter().map(|arg| shell_quote(arg)).collect())
        .unwrap_or_default();
    args.push(shell_quote(&debug_fixture.to_string_lossy()));
    format!("#!/bin/bash\n{}\n", args.join(" "))
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(unix)]
fn write_script(path: &Path, content: &str) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, content)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn write_script(path: &Path, content: &str) -> io::Result<()> {
    fs::write(path, content)
}
