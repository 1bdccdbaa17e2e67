//! RISC-V Linux ABI facts used by lowering
//!
//! This module holds the register map from allocator indices to physical
//! registers, the fixed registers of the calling convention, the raw system
//! call convention, and the width dispatcher for loads and stores.

use crate::asm::{MemWidth, Reg};
use rvssa_common::{LoweringError, RegIndex, Type};

/// Maps allocator register indices to physical registers.
///
/// The allocator numbers the integer file exactly like the hardware, so this
/// is the identity on x0..x31.
pub const SSA_REG_TO_REG: [Reg; RegIndex::COUNT] = [
    Reg::X0, Reg::X1, Reg::X2, Reg::X3, Reg::X4, Reg::X5, Reg::X6, Reg::X7,
    Reg::X8, Reg::X9, Reg::X10, Reg::X11, Reg::X12, Reg::X13, Reg::X14, Reg::X15,
    Reg::X16, Reg::X17, Reg::X18, Reg::X19, Reg::X20, Reg::X21, Reg::X22, Reg::X23,
    Reg::X24, Reg::X25, Reg::X26, Reg::X27, Reg::X28, Reg::X29, Reg::X30, Reg::X31,
];

/// Physical register for an allocator register index
pub fn ssa_reg_to_reg(index: RegIndex) -> Reg {
    SSA_REG_TO_REG[index.index()]
}

/// RISC-V calling convention registers relevant to lowering
pub struct CallingConvention;

impl CallingConvention {
    /// Stack pointer, base of the local frame
    pub const STACK_PTR: Reg = Reg::SP;

    /// Global pointer, base of external symbols
    pub const GLOBAL_BASE: Reg = Reg::GP;
}

/// Linux raw system call convention on RISC-V
///
/// The syscall number goes in a7, arguments in a0-a5, and `ecall` traps into
/// the kernel.
pub struct Syscall;

impl Syscall {
    /// First argument register (exit code for exit_group)
    pub const ARG0: Reg = Reg::A0;

    /// Register carrying the system call number
    pub const NUMBER: Reg = Reg::A7;

    /// `exit_group(2)` on riscv64 Linux
    pub const SYS_EXIT_GROUP: i64 = 94;
}

/// Select the load/store width for values of type `ty`.
///
/// Floats have no integer-register load on this backend and any width other
/// than 1, 2, 4 or 8 bytes means the value should never have reached a
/// register; both are upstream bugs.
pub fn load_by_type(ty: &Type) -> Result<MemWidth, LoweringError> {
    if ty.is_float() {
        return Err(LoweringError::FloatUnsupported {
            what: format!("load/store of {}", ty),
        });
    }

    match ty.size() {
        1 => Ok(MemWidth::Byte),
        2 => Ok(MemWidth::Half),
        4 => Ok(MemWidth::Word),
        8 => Ok(MemWidth::Double),
        size => Err(LoweringError::BadStoreType { ty: *ty, size }),
    }
}
