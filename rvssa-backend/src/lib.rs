//! RISC-V SSA backend - Lowering
//!
//! This crate turns scheduled, register-allocated SSA functions into RV64
//! instruction streams. Branch targets are left symbolic: every branch is
//! recorded as a pending branch for the patching pass that runs afterwards.

pub mod liveness;
pub mod state;
pub mod lower;

use serde::{Deserialize, Serialize};

pub use liveness::{IgnoreLiveness, LivenessEvent, LivenessLog, LivenessSink};
pub use state::{FuncOutput, GenState};
pub use lower::{lower_block, lower_function, lower_value};

/// Options for lowering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoweringOptions {
    /// Verify that address materialization is based on the register its
    /// symbol kind requires (gp for externs, sp for frame slots)
    pub check_base_reg: bool,
    /// Treat unimplemented lowerings as fatal instead of recording them
    pub fail_on_gap: bool,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            check_base_reg: true,
            fail_on_gap: false,
        }
    }
}
