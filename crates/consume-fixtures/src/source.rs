//! Fixture sources and materialization

use crate::error::ConsumeResult;
use crate::file::Fixtures;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Where a fixture comes from
#[derive(Debug, Clone)]
pub enum FixtureSource {
    /// A fixture file already on disk
    File(PathBuf),
    /// A single case held in memory (e.g. read from a stream)
    InMemory {
        /// Case identity
        id: String,
        /// Case body
        body: Value,
    },
}

impl FixtureSource {
    /// Case identity for in-memory sources
    pub fn id(&self) -> Option<&str> {
        match self {
            FixtureSource::File(_) => None,
            FixtureSource::InMemory { id, .. } => Some(id),
        }
    }

    /// Make the fixture available as a real file.
    ///
    /// In-memory cases are written as `{id: body}` to
    /// `<tempdir>/<id with '/' replaced by '_'>.json`; the directory lives as
    /// long as the returned value.
    pub fn materialize(&self) -> ConsumeResult<MaterializedFixture> {
        match self {
            FixtureSource::File(path) => Ok(MaterializedFixture {
                path: path.clone(),
                _dir: None,
            }),
            FixtureSource::InMemory { id, body } => {
                let dir = tempfile::tempdir()?;
                let path = dir.path().join(format!("{}.json", id.replace('/', "_")));
                let fixtures = Fixtures::single(id.clone(), body.clone());
                std::fs::write(&path, fixtures.to_json_pretty()?)?;
                tracing::debug!(id = %id, path = %path.display(), "materialized in-memory fixture");
                Ok(MaterializedFixture {
                    path,
                    _dir: Some(dir),
                })
            }
        }
    }
}

/// A fixture guaranteed to exist on disk
#[derive(Debug)]
pub struct MaterializedFixture {
    path: PathBuf,
    _dir: Option<TempDir>,
}

impl MaterializedFixture {
    /// Path to pass to the external binary
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_source_passthrough() {
        let source = FixtureSource::File(PathBuf::from("/fixtures/state.json"));
        let materialized = source.materialize().unwrap();
        assert_eq!(materialized.path(), Path::new("/fixtures/state.json"));
        assert!(source.id().is_none());
    }

    #[test]
    fn test_in_memory_written_and_cleaned_up() {
        let source = FixtureSource::InMemory {
            id: "tests/cancun/test_blob.py::test_case[fork_Cancun]".to_string(),
            body: json!({"blocks": []}),
        };
        let materialized = source.materialize().unwrap();
        let path = materialized.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "tests_cancun_test_blob.py::test_case[fork_Cancun].json"
        );

        let fixtures = Fixtures::load(&path).unwrap();
        assert_eq!(
            fixtures.get("tests/cancun/test_blob.py::test_case[fork_Cancun]"),
            Some(&json!({"blocks": []}))
        );

        drop(materialized);
        assert!(!path.exists());
    }
}
