//! Binary roles configured at startup

use consume_fixtures::FixtureFormat;
use std::path::{Path, PathBuf};

/// Which executable plays which role.
///
/// Built once at startup and handed to a consumer by reference. A format is
/// consumable only when its role has a binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryRoles {
    /// Binary providing `statetest`
    pub statetest: Option<PathBuf>,
    /// Binary providing `blocktest`
    pub blocktest: Option<PathBuf>,
    /// Binary providing EOF validation
    pub eoftest: Option<PathBuf>,
}

impl BinaryRoles {
    /// One binary serving both `statetest` and `blocktest`
    pub fn single(binary: impl Into<PathBuf>) -> Self {
        let binary = binary.into();
        Self {
            statetest: Some(binary.clone()),
            blocktest: Some(binary),
            eoftest: None,
        }
    }

    /// Binary configured for `format`
    pub fn binary_for(&self, format: FixtureFormat) -> Option<&Path> {
        match format {
            FixtureFormat::StateTest => self.statetest.as_deref(),
            FixtureFormat::BlockchainTest => self.blocktest.as_deref(),
            FixtureFormat::EofTest => self.eoftest.as_deref(),
        }
    }
}
