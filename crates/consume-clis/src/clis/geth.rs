//! go-ethereum `evm` fixture consumer

use crate::blocktest::BlockTestRunner;
use crate::registry::BinaryRoles;
use crate::statetest::StateTestRunner;
use crate::tool::ToolBinary;
use consume_exceptions::{
    EofException as Eof, ExceptionKind, ExceptionMapper, ExceptionTable,
    TransactionException as Tx,
};
use consume_fixtures::{
    ConsumeError, ConsumeOutcome, ConsumeResult, FixtureConsumer, FixtureFormat,
};
use std::path::Path;
use std::sync::Arc;

/// Client name used in the exception table
pub const GETH_CLIENT: &str = "go-ethereum";

/// geth error wording, in match order.
///
/// "would exceed maximum allowance" must stay ahead of the shorter "exceed
/// maximum allowance". evmone's two header-terminator errors share wording
/// closely and are kept as distinct literal rows.
const GETH_EXCEPTIONS: &[(ExceptionKind, &str)] = &[
    (
        ExceptionKind::Transaction(Tx::Type4TxContractCreation),
        "set code transaction must not be a create transaction",
    ),
    (
        ExceptionKind::Transaction(Tx::InsufficientAccountFunds),
        "insufficient funds for gas * price + value",
    ),
    (
        ExceptionKind::Transaction(Tx::Type3TxMaxBlobGasAllowanceExceeded),
        "would exceed maximum allowance",
    ),
    (
        ExceptionKind::Transaction(Tx::InsufficientMaxFeePerBlobGas),
        "max fee per blob gas less than block blob gas fee",
    ),
    (
        ExceptionKind::Transaction(Tx::InsufficientMaxFeePerGas),
        "max fee per gas less than block base fee",
    ),
    (
        ExceptionKind::Transaction(Tx::Type3TxPreFork),
        "blob tx used but field env.ExcessBlobGas missing",
    ),
    (
        ExceptionKind::Transaction(Tx::Type3TxInvalidBlobVersionedHash),
        "has invalid hash version",
    ),
    (
        ExceptionKind::Transaction(Tx::Type3TxBlobCountExceeded),
        "exceed maximum allowance",
    ),
    (
        ExceptionKind::Transaction(Tx::Type3TxZeroBlobs),
        "blob transaction missing blob hashes",
    ),
    (
        ExceptionKind::Transaction(Tx::IntrinsicGasTooLow),
        "intrinsic gas too low",
    ),
    (
        ExceptionKind::Transaction(Tx::InitcodeSizeExceeded),
        "max initcode size exceeded",
    ),
    (ExceptionKind::Eof(Eof::MissingStopOpcode), "err: no_terminating_instruction"),
    (ExceptionKind::Eof(Eof::MissingCodeHeader), "err: code_section_missing"),
    (ExceptionKind::Eof(Eof::MissingTypeHeader), "err: type_section_missing"),
    (ExceptionKind::Eof(Eof::MissingTerminator), "err: header_terminator_missing"),
    (
        ExceptionKind::Eof(Eof::MissingHeadersTerminator),
        "err: section_headers_not_terminated",
    ),
    (ExceptionKind::Eof(Eof::InvalidVersion), "err: eof_version_unknown"),
    (
        ExceptionKind::Eof(Eof::InvalidNonReturningFlag),
        "err: invalid_non_returning_flag",
    ),
    (ExceptionKind::Eof(Eof::InvalidMagic), "err: invalid_prefix"),
    (
        ExceptionKind::Eof(Eof::InvalidFirstSectionType),
        "err: invalid_first_section_type",
    ),
    (
        ExceptionKind::Eof(Eof::InvalidSectionBodiesSize),
        "err: invalid_section_bodies_size",
    ),
    (
        ExceptionKind::Eof(Eof::InvalidTypeSectionSize),
        "err: invalid_type_section_size",
    ),
    (
        ExceptionKind::Eof(Eof::IncompleteSectionSize),
        "err: incomplete_section_size",
    ),
    (
        ExceptionKind::Eof(Eof::IncompleteSectionNumber),
        "err: incomplete_section_number",
    ),
    (ExceptionKind::Eof(Eof::TooManyCodeSections), "err: too_many_code_sections"),
    (ExceptionKind::Eof(Eof::ZeroSectionSize), "err: zero_section_size"),
    (ExceptionKind::Eof(Eof::MissingDataSection), "err: data_section_missing"),
    (ExceptionKind::Eof(Eof::UndefinedInstruction), "err: undefined_instruction"),
    (
        ExceptionKind::Eof(Eof::InputsOutputsNumAboveLimit),
        "err: inputs_outputs_num_above_limit",
    ),
    (
        ExceptionKind::Eof(Eof::UnreachableInstructions),
        "err: unreachable_instructions",
    ),
    (
        ExceptionKind::Eof(Eof::InvalidRjumpDestination),
        "err: invalid_rjump_destination",
    ),
    (
        ExceptionKind::Eof(Eof::UnreachableCodeSections),
        "err: unreachable_code_sections",
    ),
    (ExceptionKind::Eof(Eof::StackUnderflow), "err: stack_underflow"),
    (
        ExceptionKind::Eof(Eof::MaxStackHeightAboveLimit),
        "err: max_stack_height_above_limit",
    ),
    (
        ExceptionKind::Eof(Eof::StackHigherThanOutputs),
        "err: stack_higher_than_outputs_required",
    ),
    (
        ExceptionKind::Eof(Eof::JumpfDestinationIncompatibleOutputs),
        "err: jumpf_destination_incompatible_outputs",
    ),
    (
        ExceptionKind::Eof(Eof::InvalidMaxStackHeight),
        "err: invalid_max_stack_height",
    ),
    (
        ExceptionKind::Eof(Eof::InvalidDataloadnIndex),
        "err: invalid_dataloadn_index",
    ),
    (ExceptionKind::Eof(Eof::TruncatedInstruction), "err: truncated_instruction"),
    (
        ExceptionKind::Eof(Eof::ToplevelContainerTruncated),
        "err: toplevel_container_truncated",
    ),
    (ExceptionKind::Eof(Eof::OrphanSubcontainer), "err: unreferenced_subcontainer"),
    (
        ExceptionKind::Eof(Eof::ContainerSizeAboveLimit),
        "err: container_size_above_limit",
    ),
    (
        ExceptionKind::Eof(Eof::InvalidContainerSectionIndex),
        "err: invalid_container_section_index",
    ),
    (
        ExceptionKind::Eof(Eof::IncompatibleContainerKind),
        "err: incompatible_container_kind",
    ),
    (ExceptionKind::Eof(Eof::StackHeightMismatch), "err: stack_height_mismatch"),
    (ExceptionKind::Eof(Eof::TooManyContainers), "err: too_many_container_sections"),
    (
        ExceptionKind::Eof(Eof::InvalidCodeSectionIndex),
        "err: invalid_code_section_index",
    ),
];

/// geth's exception table
pub fn geth_exception_table() -> ExceptionTable {
    ExceptionTable::from_static(GETH_CLIENT, GETH_EXCEPTIONS)
}

/// Mapper over geth's exception table
pub fn geth_exception_mapper() -> ExceptionMapper {
    ExceptionMapper::new(geth_exception_table())
}

/// Routes fixtures to geth's `evm statetest` / `evm blocktest`
#[derive(Debug)]
pub struct GethFixtureConsumer {
    roles: BinaryRoles,
    statetest: Option<StateTestRunner>,
    blocktest: Option<BlockTestRunner>,
    mapper: ExceptionMapper,
}

impl GethFixtureConsumer {
    /// Build runners for every configured role, using geth's exception table
    pub fn new(roles: &BinaryRoles) -> ConsumeResult<Self> {
        Self::with_mapper(roles, geth_exception_mapper())
    }

    /// Build runners for every configured role with a custom mapper
    pub fn with_mapper(roles: &BinaryRoles, mapper: ExceptionMapper) -> ConsumeResult<Self> {
        let state_binary = roles
            .statetest
            .as_deref()
            .map(|path| ToolBinary::new(path).map(Arc::new))
            .transpose()?;
        let block_binary = match (roles.blocktest.as_deref(), &state_binary) {
            (Some(path), Some(shared)) if roles.statetest.as_deref() == Some(path) => {
                Some(Arc::clone(shared))
            }
            (Some(path), _) => Some(Arc::new(ToolBinary::new(path)?)),
            (None, _) => None,
        };

        let statetest = state_binary.map(StateTestRunner::new).transpose()?;
        let blocktest = block_binary.map(BlockTestRunner::new).transpose()?;

        Ok(Self {
            roles: roles.clone(),
            statetest,
            blocktest,
            mapper,
        })
    }

    /// The `statetest` runner, if configured
    pub fn statetest(&self) -> Option<&StateTestRunner> {
        self.statetest.as_ref()
    }

    /// The `blocktest` runner, if configured
    pub fn blocktest(&self) -> Option<&BlockTestRunner> {
        self.blocktest.as_ref()
    }

    /// Whether chain tests can be run one case at a time
    pub fn run_single_case(&self) -> bool {
        self.blocktest
            .as_ref()
            .is_some_and(BlockTestRunner::supports_single_case)
    }

    /// Exception mapper for this client's error text
    pub fn mapper(&self) -> &ExceptionMapper {
        &self.mapper
    }
}

impl FixtureConsumer for GethFixtureConsumer {
    fn is_consumable(&self, format: FixtureFormat) -> bool {
        self.roles.binary_for(format).is_some()
    }

    fn consume_fixture(
        &self,
        format: FixtureFormat,
        fixture_path: &Path,
        fixture_name: Option<&str>,
        debug_dir: Option<&Path>,
    ) -> ConsumeResult<ConsumeOutcome> {
        if !self.is_consumable(format) {
            return Err(ConsumeError::UnsupportedFormat(format));
        }
        match (format, &self.statetest, &self.blocktest) {
            (FixtureFormat::StateTest, Some(runner), _) => runner
                .consume(fixture_path, debug_dir)
                .map(ConsumeOutcome::State),
            (FixtureFormat::BlockchainTest, _, Some(runner)) => runner
                .consume(fixture_path, fixture_name, debug_dir)
                .map(|()| ConsumeOutcome::Chain),
            _ => Err(ConsumeError::UnsupportedFormat(format)),
        }
    }
}
