//! Canonical exception kinds

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing a canonical kind name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseKindError {
    /// Name has no `Family.NAME` separator
    #[error("missing exception family in {0:?}")]
    MissingFamily(String),
    /// Family prefix is not a known exception family
    #[error("unknown exception family: {0}")]
    UnknownFamily(String),
    /// Name is not a member of its family
    #[error("unknown exception name: {0}")]
    UnknownName(String),
}

macro_rules! exception_family {
    (
        $(#[$meta:meta])*
        $name:ident = $prefix:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Family prefix used in qualified names
            pub const PREFIX: &'static str = $prefix;

            /// Every member, in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Upper-snake member name without the family prefix
            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }

            /// Look up a member by its upper-snake name
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $text => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}", Self::PREFIX, self.name())
            }
        }
    };
}

exception_family! {
    /// Transaction-level failures
    TransactionException = "TransactionException" {
        /// Sender cannot cover `gas * price + value`
        InsufficientAccountFunds => "INSUFFICIENT_ACCOUNT_FUNDS",
        /// Max fee per gas below the block base fee
        InsufficientMaxFeePerGas => "INSUFFICIENT_MAX_FEE_PER_GAS",
        /// Max fee per blob gas below the block blob gas price
        InsufficientMaxFeePerBlobGas => "INSUFFICIENT_MAX_FEE_PER_BLOB_GAS",
        /// Priority fee greater than max fee
        PriorityGreaterThanMaxFeePerGas => "PRIORITY_GREATER_THAN_MAX_FEE_PER_GAS",
        /// Gas limit below the intrinsic cost
        IntrinsicGasTooLow => "INTRINSIC_GAS_TOO_LOW",
        /// Initcode larger than the allowed maximum
        InitcodeSizeExceeded => "INITCODE_SIZE_EXCEEDED",
        /// Transaction gas limit above the block gas limit
        GasAllowanceExceeded => "GAS_ALLOWANCE_EXCEEDED",
        /// Nonce above the account nonce
        NonceMismatchTooHigh => "NONCE_MISMATCH_TOO_HIGH",
        /// Nonce below the account nonce
        NonceMismatchTooLow => "NONCE_MISMATCH_TOO_LOW",
        /// Sender has deployed code
        SenderNotEoa => "SENDER_NOT_EOA",
        /// Blob transaction before blobs were enabled
        Type3TxPreFork => "TYPE_3_TX_PRE_FORK",
        /// Blob transaction without blob hashes
        Type3TxZeroBlobs => "TYPE_3_TX_ZERO_BLOBS",
        /// Versioned hash with the wrong version byte
        Type3TxInvalidBlobVersionedHash => "TYPE_3_TX_INVALID_BLOB_VERSIONED_HASH",
        /// Too many blobs in one transaction
        Type3TxBlobCountExceeded => "TYPE_3_TX_BLOB_COUNT_EXCEEDED",
        /// Blob gas used above the per-block allowance
        Type3TxMaxBlobGasAllowanceExceeded => "TYPE_3_TX_MAX_BLOB_GAS_ALLOWANCE_EXCEEDED",
        /// Blob transaction used as a contract creation
        Type3TxContractCreation => "TYPE_3_TX_CONTRACT_CREATION",
        /// Set-code transaction used as a contract creation
        Type4TxContractCreation => "TYPE_4_TX_CONTRACT_CREATION",
        /// Set-code transaction with no authorizations
        Type4EmptyAuthorizationList => "TYPE_4_EMPTY_AUTHORIZATION_LIST",
        /// Authorization with an invalid signature
        Type4InvalidAuthoritySignature => "TYPE_4_INVALID_AUTHORITY_SIGNATURE",
    }
}

exception_family! {
    /// EOF container validation failures
    EofException = "EOFException" {
        /// Container does not start with the EOF magic
        InvalidMagic => "INVALID_MAGIC",
        /// Unknown EOF version byte
        InvalidVersion => "INVALID_VERSION",
        /// Type section header missing
        MissingTypeHeader => "MISSING_TYPE_HEADER",
        /// Code section header missing
        MissingCodeHeader => "MISSING_CODE_HEADER",
        /// Data section missing
        MissingDataSection => "MISSING_DATA_SECTION",
        /// Header terminator byte missing
        MissingTerminator => "MISSING_TERMINATOR",
        /// Section header list not terminated
        MissingHeadersTerminator => "MISSING_HEADERS_TERMINATOR",
        /// Code section does not end in a terminating instruction
        MissingStopOpcode => "MISSING_STOP_OPCODE",
        /// Non-returning flag set inconsistently
        InvalidNonReturningFlag => "INVALID_NON_RETURNING_FLAG",
        /// First code section has the wrong type
        InvalidFirstSectionType => "INVALID_FIRST_SECTION_TYPE",
        /// Section bodies do not match declared sizes
        InvalidSectionBodiesSize => "INVALID_SECTION_BODIES_SIZE",
        /// Type section size inconsistent with code sections
        InvalidTypeSectionSize => "INVALID_TYPE_SECTION_SIZE",
        /// Section size field truncated
        IncompleteSectionSize => "INCOMPLETE_SECTION_SIZE",
        /// Section count field truncated
        IncompleteSectionNumber => "INCOMPLETE_SECTION_NUMBER",
        /// More code sections than allowed
        TooManyCodeSections => "TOO_MANY_CODE_SECTIONS",
        /// Section declared with size zero
        ZeroSectionSize => "ZERO_SECTION_SIZE",
        /// Undefined opcode in code
        UndefinedInstruction => "UNDEFINED_INSTRUCTION",
        /// Section inputs or outputs above the limit
        InputsOutputsNumAboveLimit => "INPUTS_OUTPUTS_NUM_ABOVE_LIMIT",
        /// Instructions that can never execute
        UnreachableInstructions => "UNREACHABLE_INSTRUCTIONS",
        /// Relative jump to an invalid destination
        InvalidRjumpDestination => "INVALID_RJUMP_DESTINATION",
        /// Code sections never referenced
        UnreachableCodeSections => "UNREACHABLE_CODE_SECTIONS",
        /// Stack underflow detected during validation
        StackUnderflow => "STACK_UNDERFLOW",
        /// Max stack height above the limit
        MaxStackHeightAboveLimit => "MAX_STACK_HEIGHT_ABOVE_LIMIT",
        /// Stack higher than the declared outputs at return
        StackHigherThanOutputs => "STACK_HIGHER_THAN_OUTPUTS",
        /// JUMPF target outputs incompatible with the caller
        JumpfDestinationIncompatibleOutputs => "JUMPF_DESTINATION_INCOMPATIBLE_OUTPUTS",
        /// Declared max stack height does not match the computed one
        InvalidMaxStackHeight => "INVALID_MAX_STACK_HEIGHT",
        /// DATALOADN index out of bounds
        InvalidDataloadnIndex => "INVALID_DATALOADN_INDEX",
        /// Instruction immediate runs past the end of code
        TruncatedInstruction => "TRUNCATED_INSTRUCTION",
        /// Top-level container shorter than declared
        ToplevelContainerTruncated => "TOPLEVEL_CONTAINER_TRUNCATED",
        /// Subcontainer never referenced
        OrphanSubcontainer => "ORPHAN_SUBCONTAINER",
        /// Container larger than allowed
        ContainerSizeAboveLimit => "CONTAINER_SIZE_ABOVE_LIMIT",
        /// Container section index out of bounds
        InvalidContainerSectionIndex => "INVALID_CONTAINER_SECTION_INDEX",
        /// Subcontainer used both as initcode and runtime code
        IncompatibleContainerKind => "INCOMPATIBLE_CONTAINER_KIND",
        /// Stack heights disagree at a merge point
        StackHeightMismatch => "STACK_HEIGHT_MISMATCH",
        /// More container sections than allowed
        TooManyContainers => "TOO_MANY_CONTAINERS",
        /// Code section index out of bounds
        InvalidCodeSectionIndex => "INVALID_CODE_SECTION_INDEX",
    }
}

/// A canonical, client-independent failure reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExceptionKind {
    /// Transaction-level failure
    Transaction(TransactionException),
    /// EOF container validation failure
    Eof(EofException),
}

impl ExceptionKind {
    /// Iterate every canonical kind across both families
    pub fn all() -> impl Iterator<Item = ExceptionKind> {
        TransactionException::ALL
            .iter()
            .copied()
            .map(ExceptionKind::Transaction)
            .chain(EofException::ALL.iter().copied().map(ExceptionKind::Eof))
    }

    /// Upper-snake member name without the family prefix
    pub fn name(&self) -> &'static str {
        match self {
            ExceptionKind::Transaction(e) => e.name(),
            ExceptionKind::Eof(e) => e.name(),
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExceptionKind::Transaction(e) => fmt::Display::fmt(e, f),
            ExceptionKind::Eof(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl FromStr for ExceptionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (family, name) = s
            .split_once('.')
            .ok_or_else(|| ParseKindError::MissingFamily(s.to_string()))?;
        let unknown = || ParseKindError::UnknownName(s.to_string());
        match family {
            TransactionException::PREFIX => TransactionException::from_name(name)
                .map(ExceptionKind::Transaction)
                .ok_or_else(unknown),
            EofException::PREFIX => EofException::from_name(name)
                .map(ExceptionKind::Eof)
                .ok_or_else(unknown),
            other => Err(ParseKindError::UnknownFamily(other.to_string())),
        }
    }
}

impl From<TransactionException> for ExceptionKind {
    fn from(e: TransactionException) -> Self {
        ExceptionKind::Transaction(e)
    }
}

impl From<EofException> for ExceptionKind {
    fn from(e: EofException) -> Self {
        ExceptionKind::Eof(e)
    }
}

impl Serialize for ExceptionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExceptionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Expected-exception field of a fixture: one or more `|`-separated kinds,
/// any of which is an acceptable outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedExceptions(Vec<ExceptionKind>);

impl ExpectedExceptions {
    /// Parse `"A|B|C"`
    pub fn parse(s: &str) -> Result<Self, ParseKindError> {
        s.split('|')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(ExpectedExceptions)
    }

    /// Whether `kind` is one of the acceptable outcomes
    pub fn matches(&self, kind: ExceptionKind) -> bool {
        self.0.contains(&kind)
    }

    /// Acceptable kinds, in fixture order
    pub fn kinds(&self) -> &[ExceptionKind] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_qualified_name() {
        let kind = ExceptionKind::from(TransactionException::IntrinsicGasTooLow);
        assert_eq!(kind.to_string(), "TransactionException.INTRINSIC_GAS_TOO_LOW");

        let kind = ExceptionKind::from(EofException::InvalidMagic);
        assert_eq!(kind.to_string(), "EOFException.INVALID_MAGIC");
    }

    #[test]
    fn test_parse_every_kind() {
        for kind in ExceptionKind::all() {
            let parsed: ExceptionKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "INTRINSIC_GAS_TOO_LOW".parse::<ExceptionKind>(),
            Err(ParseKindError::MissingFamily(_))
        ));
        assert!(matches!(
            "BlockException.INCORRECT_BLOB_GAS_USED".parse::<ExceptionKind>(),
            Err(ParseKindError::UnknownFamily(_))
        ));
        assert!(matches!(
            "EOFException.NOT_A_THING".parse::<ExceptionKind>(),
            Err(ParseKindError::UnknownName(_))
        ));
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<String> = ExceptionKind::all().map(|k| k.to_string()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_expected_exceptions() {
        let expected = ExpectedExceptions::parse(
            "TransactionException.TYPE_3_TX_MAX_BLOB_GAS_ALLOWANCE_EXCEEDED|TransactionException.TYPE_3_TX_BLOB_COUNT_EXCEEDED",
        )
        .unwrap();
        assert_eq!(expected.kinds().len(), 2);
        assert!(expected.matches(TransactionException::Type3TxBlobCountExceeded.into()));
        assert!(!expected.matches(TransactionException::IntrinsicGasTooLow.into()));
    }

    #[test]
    fn test_serde_as_string() {
        let kind = ExceptionKind::from(EofException::StackHeightMismatch);
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#""EOFException.STACK_HEIGHT_MISMATCH""#);
        let back: ExceptionKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }
}
