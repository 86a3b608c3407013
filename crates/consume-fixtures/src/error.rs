//! Error types for fixture consumption

use crate::format::FixtureFormat;
use consume_exceptions::{Classification, ExceptionMapper};
use std::borrow::Cow;
use thiserror::Error;

/// Fixture consumption error
#[derive(Error, Debug)]
pub enum ConsumeError {
    /// The external binary could not be started
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// Command line that failed to start
        command: String,
        /// Underlying OS error
        source: std::io::Error,
    },

    /// The external binary ran and exited unsuccessfully
    #[error(
        "Unexpected exit code ({}):\n{}\n\n Error:\n{}",
        exit_label(.exit_code),
        .command,
        String::from_utf8_lossy(.stderr)
    )]
    Invocation {
        /// Full command line
        command: String,
        /// Exit code, `None` if the process was killed by a signal
        exit_code: Option<i32>,
        /// Captured standard error, byte for byte
        stderr: Vec<u8>,
    },

    /// Exit was 0 but standard output did not have the expected shape
    #[error("Unexpected result from `{command}`: {detail}")]
    ResultParse {
        /// Full command line
        command: String,
        /// What was wrong with the output
        detail: String,
        /// Captured standard output, verbatim
        stdout: String,
    },

    /// No configured binary role or runner for the format
    #[error("Fixture format `{0}` is not consumable by this tool")]
    UnsupportedFormat(FixtureFormat),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

impl ConsumeError {
    /// Client diagnostic text, present only for invocation failures.
    ///
    /// Decoded lossily; the raw bytes stay in [`ConsumeError::Invocation`].
    pub fn diagnostic(&self) -> Option<Cow<'_, str>> {
        match self {
            ConsumeError::Invocation { stderr, .. } => Some(String::from_utf8_lossy(stderr)),
            _ => None,
        }
    }

    /// Classify the diagnostic text against a client's exception table.
    ///
    /// Errors without client diagnostics are always unmapped.
    pub fn classify(&self, mapper: &ExceptionMapper) -> Classification {
        let Some(text) = self.diagnostic() else {
            return Classification::Unmapped;
        };
        let classification = mapper.classify(&text);
        if !classification.is_mapped() {
            tracing::warn!(
                client = mapper.table().client(),
                "no exception table entry matched client error output"
            );
        }
        classification
    }

    /// Whether this is an infrastructure fault rather than a test failure
    pub fn is_infrastructure(&self) -> bool {
        !matches!(self, ConsumeError::Invocation { .. })
    }
}

/// Consume result type
pub type ConsumeResult<T> = Result<T, ConsumeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use consume_exceptions::{ExceptionEntry, ExceptionTable, TransactionException};

    fn mapper() -> ExceptionMapper {
        ExceptionMapper::new(ExceptionTable::new(
            "test",
            vec![ExceptionEntry::new(
                TransactionException::IntrinsicGasTooLow,
                "intrinsic gas too low",
            )],
        ))
    }

    #[test]
    fn test_invocation_message_contains_stderr() {
        let err = ConsumeError::Invocation {
            command: "evm blocktest fixture.json".to_string(),
            exit_code: Some(1),
            stderr: b"unexpected state root".to_vec(),
        };
        let msg = err.to_string();
        assert!(msg.contains("evm blocktest fixture.json"));
        assert!(msg.contains("unexpected state root"));
        assert!(msg.contains("(1)"));
    }

    #[test]
    fn test_classify_invocation() {
        let err = ConsumeError::Invocation {
            command: "evm statetest x.json".to_string(),
            exit_code: Some(1),
            stderr: b"intrinsic gas too low".to_vec(),
        };
        assert_eq!(
            err.classify(&mapper()),
            Classification::Mapped(TransactionException::IntrinsicGasTooLow.into())
        );
        assert!(!err.is_infrastructure());
    }

    #[test]
    fn test_classify_non_invocation_is_unmapped() {
        let err = ConsumeError::UnsupportedFormat(FixtureFormat::EofTest);
        assert_eq!(err.classify(&mapper()), Classification::Unmapped);
        assert!(err.is_infrastructure());
        assert!(err.to_string().contains("eof_test"));
    }

    #[test]
    fn test_signal_exit_label() {
        let err = ConsumeError::Invocation {
            command: "evm statetest x.json".to_string(),
            exit_code: None,
            stderr: Vec::new(),
        };
        assert!(err.to_string().contains("(signal)"));
    }

    #[test]
    fn test_non_utf8_stderr_kept_raw() {
        let mut stderr = vec![0xff, 0xfe];
        stderr.extend_from_slice(b" intrinsic gas too low\n");
        let err = ConsumeError::Invocation {
            command: "evm statetest x.json".to_string(),
            exit_code: Some(1),
            stderr: stderr.clone(),
        };

        match &err {
            ConsumeError::Invocation { stderr: kept, .. } => assert_eq!(kept, &stderr),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("\u{fffd}\u{fffd} intrinsic gas too low"));
        assert_eq!(
            err.classify(&mapper()),
            Classification::Mapped(TransactionException::IntrinsicGasTooLow.into())
        );
    }
}
