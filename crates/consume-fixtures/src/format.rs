//! Fixture formats

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown fixture format name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fixture format: {0}")]
pub struct ParseFormatError(pub String);

/// Closed set of fixture formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureFormat {
    /// Single-transaction state test, consumed by `statetest`
    StateTest,
    /// Multi-block chain test, consumed by `blocktest`
    BlockchainTest,
    /// EOF container validation test
    EofTest,
}

impl FixtureFormat {
    /// All formats
    pub const ALL: [FixtureFormat; 3] = [
        FixtureFormat::StateTest,
        FixtureFormat::BlockchainTest,
        FixtureFormat::EofTest,
    ];

    /// Format name as used in fixture indexes and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            FixtureFormat::StateTest => "state_test",
            FixtureFormat::BlockchainTest => "blockchain_test",
            FixtureFormat::EofTest => "eof_test",
        }
    }

    /// Infer the format of a single case body from its top-level keys
    pub fn detect(body: &Value) -> Option<FixtureFormat> {
        let obj = body.as_object()?;
        if obj.contains_key("transaction") && obj.contains_key("post") {
            Some(FixtureFormat::StateTest)
        } else if obj.contains_key("blocks") || obj.contains_key("genesisBlockHeader") {
            Some(FixtureFormat::BlockchainTest)
        } else if obj.contains_key("vectors") {
            Some(FixtureFormat::EofTest)
        } else {
            None
        }
    }
}

impl fmt::Display for FixtureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FixtureFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FixtureFormat::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| ParseFormatError(s.to_string()))
    }
}

impl Serialize for FixtureFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FixtureFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
