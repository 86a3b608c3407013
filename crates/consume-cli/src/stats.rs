//! Consume run statistics

use consume_exceptions::{Classification, ExceptionMapper};
use consume_fixtures::{ConsumeError, ConsumeOutcome};
use serde::Serialize;
use std::time::Duration;

/// One failed or errored unit of work
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    /// `<file>` or `<file>::<case>`
    pub name: String,
    /// Short reason
    pub reason: String,
    /// Canonical kind of the client diagnostic
    pub classification: Classification,
}

/// Aggregated results across every consumed fixture file
#[derive(Debug, Default, Serialize)]
pub struct ConsumeStats {
    /// Cases (or whole chain-test files) executed
    pub total: usize,
    /// Passed
    pub passed: usize,
    /// Failed with a client verdict
    pub failed: usize,
    /// Could not be consumed (spawn, parse, IO)
    pub errors: usize,
    /// Skipped because no binary handles the format
    pub skipped: usize,
    /// Total execution time
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
    /// Failure and error details
    pub failures: Vec<Failure>,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl ConsumeStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a successful consume outcome.
    ///
    /// State tests count per case and a case's `error` text is classified
    /// with `mapper`; a record without the expected shape counts as an
    /// error. A chain verdict counts once.
    pub fn add_outcome(
        &mut self,
        name: &str,
        outcome: &ConsumeOutcome,
        mapper: &ExceptionMapper,
    ) {
        match outcome {
            ConsumeOutcome::Chain => {
                self.total += 1;
                self.passed += 1;
            }
            ConsumeOutcome::State(_) => {
                for record in outcome.case_records() {
                    self.total += 1;
                    match record {
                        Ok(case) if case.passed() => self.passed += 1,
                        Ok(case) => {
                            self.failed += 1;
                            let classification = case
                                .error
                                .as_deref()
                                .map_or(Classification::Unmapped, |error| mapper.classify(error));
                            self.failures.push(Failure {
                                name: format!("{}::{}", name, case.name),
                                reason: case.error.unwrap_or_else(|| "pass: false".to_string()),
                                classification,
                            });
                        }
                        Err(malformed) => {
                            self.errors += 1;
                            self.failures.push(Failure {
                                name: format!("{}::{}", name, malformed.label()),
                                reason: malformed.reason,
                                classification: Classification::Unmapped,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Add a consume error, classifying client diagnostics with `mapper`
    pub fn add_error(&mut self, name: &str, error: &ConsumeError, mapper: &ExceptionMapper) {
        self.total += 1;
        let classification = error.classify(mapper);
        let reason = match error {
            ConsumeError::Invocation { exit_code, .. } => {
                self.failed += 1;
                match exit_code {
                    Some(code) => format!("exit code {}", code),
                    None => "killed by signal".to_string(),
                }
            }
            other => {
                self.errors += 1;
                other.to_string()
            }
        };
        self.failures.push(Failure {
            name: name.to_string(),
            reason,
            classification,
        });
    }

    /// Record a file that no binary can consume
    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Whether any case failed or errored
    pub fn has_failures(&self) -> bool {
        self.failed + self.errors > 0
    }

    /// Pass rate as percentage
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed + self.errors;
        if executed == 0 {
            return 100.0;
        }
        (self.passed as f64 / executed as f64) * 100.0
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "========================================".to_string(),
            "Consume Summary".to_string(),
            "========================================".to_string(),
            format!("Total:   {}", self.total),
            format!("Passed:  {}", self.passed),
            format!("Failed:  {}", self.failed),
            format!("Errors:  {}", self.errors),
            format!("Skipped: {}", self.skipped),
            format!("Pass Rate: {:.2}%", self.pass_rate()),
            format!("Duration: {:.2}s", self.duration.as_secs_f64()),
        ];

        if !self.failures.is_empty() {
            lines.push(String::new());
            lines.push("Failures:".to_string());
            for failure in &self.failures {
                lines.push(format!(
                    "  - {}: {} [{}]",
                    failure.name, failure.reason, failure.classification
                ));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consume_clis::clis::geth::geth_exception_mapper;
    use consume_exceptions::{ExceptionKind, TransactionException};
    use serde_json::json;

    #[test]
    fn test_state_cases_counted_individually() {
        let mut stats = ConsumeStats::new();
        let outcome = ConsumeOutcome::State(vec![
            json!({"name": "a", "pass": true}),
            json!({"name": "b", "pass": false, "error": "gas mismatch"}),
            json!({"name": "c"}),
        ]);
        stats.add_outcome("state.json", &outcome, &geth_exception_mapper());

        assert_eq!(stats.total, 3);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.failures[0].name, "state.json::b");
        assert_eq!(stats.failures[0].reason, "gas mismatch");
        assert!(stats.has_failures());
    }

    #[test]
    fn test_case_error_is_classified() {
        let mut stats = ConsumeStats::new();
        let outcome = ConsumeOutcome::State(vec![json!({
            "name": "t1",
            "pass": false,
            "error": "transaction 0: intrinsic gas too low: have 21000, want 53000",
        })]);
        stats.add_outcome("state.json", &outcome, &geth_exception_mapper());

        assert_eq!(stats.failed, 1);
        assert_eq!(
            stats.failures[0].classification,
            Classification::Mapped(ExceptionKind::Transaction(
                TransactionException::IntrinsicGasTooLow
            ))
        );
    }

    #[test]
    fn test_malformed_records_are_not_passes() {
        let mut stats = ConsumeStats::new();
        let outcome = ConsumeOutcome::State(vec![
            json!({"name": "t1", "pass": false, "fork": 1}),
            json!({"name": "t2", "pass": "false"}),
            json!("t3"),
        ]);
        stats.add_outcome("state.json", &outcome, &geth_exception_mapper());

        assert_eq!(stats.total, 3);
        assert_eq!(stats.passed, 0);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.errors, 2);
        assert_eq!(stats.failures[0].name, "state.json::t1");
        assert_eq!(stats.failures[0].reason, "pass: false");
        assert_eq!(stats.failures[1].name, "state.json::t2");
        assert_eq!(stats.failures[2].name, "state.json::#2");
        assert!(stats.has_failures());
    }

    #[test]
    fn test_invocation_error_is_classified_failure() {
        let mut stats = ConsumeStats::new();
        let err = ConsumeError::Invocation {
            command: "evm statetest f.json".to_string(),
            exit_code: Some(1),
            stderr: b"intrinsic gas too low: have 0".to_vec(),
        };
        stats.add_error("f.json", &err, &geth_exception_mapper());

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.errors, 0);
        assert_eq!(
            stats.failures[0].classification,
            Classification::Mapped(ExceptionKind::Transaction(
                TransactionException::IntrinsicGasTooLow
            ))
        );
        assert_eq!(stats.failures[0].reason, "exit code 1");
    }

    #[test]
    fn test_infrastructure_error_counted_separately() {
        let mut stats = ConsumeStats::new();
        let err = ConsumeError::ResultParse {
            command: "evm statetest f.json".to_string(),
            detail: "stdout is not valid JSON".to_string(),
            stdout: "garbage".to_string(),
        };
        stats.add_error("f.json", &err, &geth_exception_mapper());

        assert_eq!(stats.errors, 1);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.failures[0].classification, Classification::Unmapped);
        assert_eq!(stats.pass_rate(), 0.0);
    }

    #[test]
    fn test_empty_run_passes() {
        let mut stats = ConsumeStats::new();
        stats.add_skipped();
        stats.add_outcome("chain.json", &ConsumeOutcome::Chain, &geth_exception_mapper());
        assert!(!stats.has_failures());
        assert_eq!(stats.pass_rate(), 100.0);
        assert!(stats.summary().contains("Skipped: 1"));
    }
}
