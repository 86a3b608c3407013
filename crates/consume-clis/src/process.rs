//! Child process invocation

use consume_fixtures::{ConsumeError, ConsumeResult};
use std::process::{Command, ExitStatus, Stdio};

/// Everything observed from one run of an external binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// Exact argv, binary first
    pub command: Vec<String>,
    /// Exit code; on unix a signal-terminated child reports `-signal`
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: Vec<u8>,
    /// Captured standard error
    pub stderr: Vec<u8>,
}

impl InvocationResult {
    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Command line as a single space-joined string
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    /// Standard output as text
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard error as text
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Convert a finished run into `Ok(self)` on exit 0, or an
    /// invocation error carrying the command line and stderr
    pub fn check_success(self) -> ConsumeResult<Self> {
        if self.success() {
            return Ok(self);
        }
        tracing::warn!(
            command = %self.command_line(),
            exit_code = ?self.exit_code,
            "external binary exited unsuccessfully"
        );
        Err(ConsumeError::Invocation {
            command: self.command_line(),
            exit_code: self.exit_code,
            stderr: self.stderr,
        })
    }
}

/// Run `command` to completion, capturing stdout and stderr.
///
/// Standard input is closed. A nonzero exit is not an error here; only a
/// failure to start the process is.
pub fn run_command(command: &[String]) -> ConsumeResult<InvocationResult> {
    let command_line = command.join(" ");
    let (program, args) = command.split_first().ok_or_else(|| ConsumeError::Spawn {
        command: command_line.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
    })?;

    tracing::debug!(command = %command_line, "running external binary");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ConsumeError::Spawn {
            command: command_line.clone(),
            source,
        })?;

    let exit_code = exit_code(&output.status);
    tracing::debug!(command = %command_line, exit_code = ?exit_code, "external binary finished");

    Ok(InvocationResult {
        command: command.to_vec(),
        exit_code,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

#[cfg(unix)]
fn exit_code(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.code().or_else(|| status.signal().map(|sig| -sig))
}

#[cfg(not(unix))]
fn exit_code(status: &ExitStatus) -> Option<i32> {
    status.code()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(code: Option<i32>, stderr: &str) -> InvocationResult {
        InvocationResult {
            command: vec!["evm".into(), "statetest".into(), "x.json".into()],
            exit_code: code,
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_check_success_passes_through() {
        let r = result(Some(0), "").check_success().unwrap();
        assert_eq!(r.command_line(), "evm statetest x.json");
    }

    #[test]
    fn test_check_success_nonzero() {
        let err = result(Some(1), "boom").check_success().unwrap_err();
        match err {
            ConsumeError::Invocation { command, exit_code, stderr } => {
                assert_eq!(command, "evm statetest x.json");
                assert_eq!(exit_code, Some(1));
                assert_eq!(stderr, b"boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_run_command_empty() {
        assert!(matches!(run_command(&[]), Err(ConsumeError::Spawn { .. })));
    }

    #[test]
    fn test_run_command_missing_binary() {
        let command = vec!["/nonexistent/definitely-not-evm".to_string()];
        assert!(matches!(run_command(&command), Err(ConsumeError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_captures_output() {
        let command: Vec<String> = ["sh", "-c", "printf out; printf err >&2; exit 3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let r = run_command(&command).unwrap();
        assert_eq!(r.exit_code, Some(3));
        assert_eq!(r.stdout, b"out");
        assert_eq!(r.stderr, b"err");
        assert!(!r.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_invocation_error_keeps_raw_stderr() {
        let command: Vec<String> = ["sh", "-c", r"printf '\377\376bad\n' >&2; exit 1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = run_command(&command).unwrap().check_success().unwrap_err();
        match err {
            ConsumeError::Invocation { stderr, .. } => {
                assert_eq!(stderr, [0xff, 0xfe, b'b', b'a', b'd', b'\n']);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
