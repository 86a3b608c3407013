//! Fixture consumer interface

use crate::error::{ConsumeError, ConsumeResult};
use crate::format::FixtureFormat;
use crate::outcome::ConsumeOutcome;
use crate::source::FixtureSource;
use std::path::Path;

/// A client family that can verify fixtures through its command-line tools.
///
/// Implementations route each format to the runner that handles it. A format
/// is only dispatched after [`is_consumable`](Self::is_consumable) confirms a
/// binary is configured for it.
pub trait FixtureConsumer {
    /// Whether a binary role is configured for `format`
    fn is_consumable(&self, format: FixtureFormat) -> bool;

    /// Consume the fixture file at `fixture_path`.
    ///
    /// `fixture_name` restricts a chain test to one case when the binary
    /// supports it; `debug_dir` requests a reproduction bundle.
    fn consume_fixture(
        &self,
        format: FixtureFormat,
        fixture_path: &Path,
        fixture_name: Option<&str>,
        debug_dir: Option<&Path>,
    ) -> ConsumeResult<ConsumeOutcome>;

    /// Consume a fixture from any source, materializing in-memory cases first.
    ///
    /// For in-memory sources the case id is used as the name when none is
    /// given.
    fn consume_source(
        &self,
        format: FixtureFormat,
        source: &FixtureSource,
        fixture_name: Option<&str>,
        debug_dir: Option<&Path>,
    ) -> ConsumeResult<ConsumeOutcome> {
        if !self.is_consumable(format) {
            return Err(ConsumeError::UnsupportedFormat(format));
        }
        let materialized = source.materialize()?;
        let name = fixture_name.or_else(|| source.id());
        self.consume_fixture(format, materialized.path(), name, debug_dir)
    }
}
