//! External binary identity and capability probing

use crate::process::run_command;
use consume_fixtures::ConsumeResult;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Flags prepended before the subcommand when a debug bundle is requested
pub const DEBUG_FLAGS: &[&str] = &["--debug", "--json", "--verbosity", "100"];

/// First line of `evm --version` for a go-ethereum `evm` binary
static EVM_VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^evm(\.exe)? version\b").expect("evm version regex is valid"));

/// A resolved external executable.
///
/// Built once; its version line is read at construction and never changes.
#[derive(Debug, Clone)]
pub struct ToolBinary {
    path: PathBuf,
    version: Option<String>,
}

impl ToolBinary {
    /// Resolve `binary` (searching `PATH` for bare names) and read its version
    pub fn new(binary: impl AsRef<Path>) -> ConsumeResult<Self> {
        let path = resolve(binary.as_ref());
        let result = run_command(&[path.to_string_lossy().into_owned(), "--version".to_string()])?;
        let version = result
            .stdout_text()
            .lines()
            .chain(result.stderr_text().lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string);
        tracing::info!(binary = %path.display(), version = ?version, "resolved external binary");
        Ok(Self { path, version })
    }

    /// Executable path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First non-empty line of `--version` output
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Whether the version line identifies a go-ethereum `evm` binary
    pub fn is_detected(&self) -> bool {
        self.version
            .as_deref()
            .is_some_and(|line| EVM_VERSION_REGEX.is_match(line))
    }

    /// Command prefix: the binary, plus debug flags when requested
    pub fn base_command(&self, debug: bool) -> Vec<String> {
        let mut command = vec![self.path.to_string_lossy().into_owned()];
        if debug {
            command.extend(DEBUG_FLAGS.iter().map(|flag| flag.to_string()));
        }
        command
    }
}

fn resolve(binary: &Path) -> PathBuf {
    if binary.components().count() != 1 {
        return binary.to_path_buf();
    }
    std::env::var_os("PATH")
        .and_then(|paths| {
            std::env::split_paths(&paths)
                .map(|dir| dir.join(binary))
                .find(|candidate| candidate.is_file())
        })
        .unwrap_or_else(|| binary.to_path_buf())
}

/// Cached `<binary> <subcommand> --help` output.
///
/// There is no structured capability API, so feature checks are substring
/// tests on the help text. They are advisory: a feature whose help-text name
/// differs from its internal name reports as unsupported.
#[derive(Debug, Clone)]
pub struct ToolCapabilityProbe {
    subcommand: String,
    help: String,
}

impl ToolCapabilityProbe {
    /// Run `<binary> <subcommand> --help` once and keep its stdout
    pub fn probe(binary: &ToolBinary, subcommand: &str) -> ConsumeResult<Self> {
        let command = vec![
            binary.path().to_string_lossy().into_owned(),
            subcommand.to_string(),
            "--help".to_string(),
        ];
        let result = run_command(&command)?;
        let help = result.stdout_text();
        tracing::info!(
            binary = %binary.path().display(),
            subcommand,
            help_bytes = help.len(),
            "probed subcommand help"
        );
        Ok(Self {
            subcommand: subcommand.to_string(),
            help,
        })
    }

    /// Probe with help text already in hand
    pub fn from_help(subcommand: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            subcommand: subcommand.into(),
            help: help.into(),
        }
    }

    /// Probed subcommand
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// Cached help text
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Whether `feature` appears in the help text
    pub fn supports(&self, feature: &str) -> bool {
        self.help.contains(feature)
    }

    /// Whether a fork name appears in the help text
    pub fn supports_fork(&self, fork: &str) -> bool {
        self.supports(fork)
    }
}

/// Capability set shared by every runner of one binary family
pub trait ConsumerTool {
    /// Subcommand the runner drives
    const SUBCOMMAND: &'static str;

    /// The binary this runner invokes
    fn binary(&self) -> &ToolBinary;

    /// Cached help probe for [`Self::SUBCOMMAND`]
    fn probe(&self) -> &ToolCapabilityProbe;

    /// Help text of the subcommand
    fn help(&self) -> &str {
        self.probe().help()
    }

    /// Advisory feature check against the help text
    fn supports(&self, feature: &str) -> bool {
        self.probe().supports(feature)
    }
}
