//! Error handling for the RISC-V SSA backend
//!
//! Lowering has two tiers of failure:
//!
//! - [`LoweringError`]: fatal internal-consistency errors. Any of these means an
//!   earlier pipeline stage handed us malformed input, and the compilation unit
//!   is aborted. They carry the op or block kind name plus a description of the
//!   enclosing value or block.
//! - [`Gap`]: lowering that is known to be missing on this target. Gaps are
//!   logged and recorded on the function output so callers can refuse to use
//!   incomplete code; they do not stop the lowering of the rest of the function.

use crate::types::{Type, ValueId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fatal lowering error (compiler-bug class)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoweringError {
    #[error("Unhandled op {op}: {value}")]
    UnhandledOp { op: String, value: String },

    #[error("Unhandled kind {kind}: {block}")]
    UnhandledKind { kind: String, block: String },

    #[error("float unsupported: {what}")]
    FloatUnsupported { what: String },

    #[error("bad store type {ty} (size {size})")]
    BadStoreType { ty: Type, size: u64 },

    #[error("aux is of unexpected kind {aux}: {value}")]
    BadAux { aux: String, value: String },

    #[error("memory offset overflows: {value}")]
    OffsetOverflow { value: String },

    #[error("bad reg {found} for symbol type {aux}, want {want}: {value}")]
    BadBaseReg {
        found: String,
        want: String,
        aux: String,
        value: String,
    },

    #[error("control value in the wrong block {owner}, want {block}: {value}")]
    MisplacedControl {
        owner: String,
        block: String,
        value: String,
    },

    #[error("badly scheduled control value for block {block}: {value}")]
    BadlyScheduledControl { block: String, value: String },

    #[error("control value for block {block} is not a branch condition: {value}")]
    BadControlOp { block: String, value: String },

    #[error("block {block} has no control value")]
    NoControl { block: String },

    #[error("block {block} of kind {kind} has {found} successors, want {want}")]
    BadSuccessors {
        block: String,
        kind: String,
        found: usize,
        want: usize,
    },

    #[error("no register assigned: {value}")]
    NoRegister { value: String },

    #[error("no stack slot recorded for {value}")]
    MissingSlot { value: String },

    #[error("reference to unknown value v{id}")]
    MissingValue { id: ValueId },

    #[error("missing argument {index}: {value}")]
    MissingArg { index: usize, value: String },

    #[error("unimplemented: {what}: {value}")]
    Unimplemented { what: String, value: String },

    #[error("phi not lowered, argument in {arg_reg} but phi in {phi_reg}: {value}")]
    PhiNotLowered {
        phi_reg: String,
        arg_reg: String,
        value: String,
    },
}

impl LoweringError {
    /// Short machine-friendly name of the error class
    pub fn class(&self) -> &'static str {
        match self {
            LoweringError::UnhandledOp { .. } => "unhandled-op",
            LoweringError::UnhandledKind { .. } => "unhandled-kind",
            LoweringError::FloatUnsupported { .. } => "float-unsupported",
            LoweringError::BadStoreType { .. } => "bad-store-type",
            LoweringError::BadAux { .. } => "bad-aux",
            LoweringError::OffsetOverflow { .. } => "offset-overflow",
            LoweringError::BadBaseReg { .. } => "bad-base-reg",
            LoweringError::MisplacedControl { .. } => "misplaced-control",
            LoweringError::BadlyScheduledControl { .. } => "badly-scheduled-control",
            LoweringError::BadControlOp { .. } => "bad-control-op",
            LoweringError::NoControl { .. } => "no-control",
            LoweringError::BadSuccessors { .. } => "bad-successors",
            LoweringError::NoRegister { .. } => "no-register",
            LoweringError::MissingSlot { .. } => "missing-slot",
            LoweringError::MissingValue { .. } => "missing-value",
            LoweringError::MissingArg { .. } => "missing-arg",
            LoweringError::Unimplemented { .. } => "unimplemented",
            LoweringError::PhiNotLowered { .. } => "phi-not-lowered",
        }
    }
}

/// A piece of lowering that is not implemented for this target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gap {
    /// The value was skipped: no instructions were emitted for it
    Unimplemented { what: String, value: String },
}

impl Gap {
    pub fn unimplemented(what: &str, value: String) -> Self {
        Gap::Unimplemented {
            what: what.to_string(),
            value,
        }
    }
}

impl From<Gap> for LoweringError {
    fn from(gap: Gap) -> Self {
        match gap {
            Gap::Unimplemented { what, value } => LoweringError::Unimplemented { what, value },
        }
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gap::Unimplemented { what, value } => write!(f, "unimplemented: {}: {}", what, value),
        }
    }
}
