//! Tests for the provided `consume_source` path of `FixtureConsumer`

use consume_fixtures::{
    debug_dump_dir, ConsumeError, ConsumeOutcome, ConsumeResult, FixtureConsumer, FixtureFormat,
    FixtureSource, Fixtures,
};
use serde_json::json;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Records every call and reads the fixture while it still exists
#[derive(Default)]
struct RecordingConsumer {
    calls: RefCell<Vec<(PathBuf, Option<String>, Option<PathBuf>, Fixtures)>>,
}

impl FixtureConsumer for RecordingConsumer {
    fn is_consumable(&self, format: FixtureFormat) -> bool {
        format == FixtureFormat::BlockchainTest
    }

    fn consume_fixture(
        &self,
        _format: FixtureFormat,
        fixture_path: &Path,
        fixture_name: Option<&str>,
        debug_dir: Option<&Path>,
    ) -> ConsumeResult<ConsumeOutcome> {
        let fixtures = Fixtures::load(fixture_path)?;
        self.calls.borrow_mut().push((
            fixture_path.to_path_buf(),
            fixture_name.map(str::to_string),
            debug_dir.map(Path::to_path_buf),
            fixtures,
        ));
        Ok(ConsumeOutcome::Chain)
    }
}

#[test]
fn test_in_memory_source_materialized_and_named() {
    let consumer = RecordingConsumer::default();
    let body = json!({"genesisBlockHeader": {"number": "0x00"}, "blocks": []});
    let source = FixtureSource::InMemory {
        id: "tests/prague/test_a.py::test_a[fork_Prague]".to_string(),
        body: body.clone(),
    };

    let outcome = consumer
        .consume_source(FixtureFormat::BlockchainTest, &source, None, None)
        .unwrap();
    assert_eq!(outcome, ConsumeOutcome::Chain);

    let calls = consumer.calls.borrow();
    let (path, name, debug_dir, fixtures) = &calls[0];
    assert_eq!(name.as_deref(), Some("tests/prague/test_a.py::test_a[fork_Prague]"));
    assert!(debug_dir.is_none());
    assert_eq!(fixtures.len(), 1);
    assert_eq!(
        fixtures.get("tests/prague/test_a.py::test_a[fork_Prague]"),
        Some(&body)
    );
    assert_eq!(fixtures.detect_format(), Some(FixtureFormat::BlockchainTest));
    assert!(!path.exists(), "materialized file outlives the call");
}

#[test]
fn test_explicit_name_wins_over_id() {
    let consumer = RecordingConsumer::default();
    let source = FixtureSource::InMemory {
        id: "case-id".to_string(),
        body: json!({"blocks": []}),
    };
    let dump = debug_dump_dir(Path::new("/tmp/dump"), Path::new("case-id.json"), Some("other"), true);

    consumer
        .consume_source(FixtureFormat::BlockchainTest, &source, Some("other"), Some(&dump))
        .unwrap();

    let calls = consumer.calls.borrow();
    assert_eq!(calls[0].1.as_deref(), Some("other"));
    assert_eq!(calls[0].2.as_deref(), Some(Path::new("/tmp/dump/case-id/other")));
}

#[test]
fn test_unconsumable_format_not_materialized() {
    let consumer = RecordingConsumer::default();
    let source = FixtureSource::File(PathBuf::from("/nonexistent/state.json"));

    let err = consumer
        .consume_source(FixtureFormat::StateTest, &source, None, None)
        .unwrap_err();

    assert!(matches!(err, ConsumeError::UnsupportedFormat(FixtureFormat::StateTest)));
    assert!(err.is_infrastructure());
    assert!(consumer.calls.borrow().is_empty());
}
