//! RISC-V SSA backend - Machine Model
//!
//! This crate describes the target side of lowering:
//!
//! - Assembly instruction and register definitions
//! - ABI facts (register map, fixed registers, raw syscall convention)
//! - The per-function instruction stream and pending branch records
//! - Text emission of instruction streams

pub mod asm;
pub mod abi;
pub mod stream;
pub mod emit;

pub use asm::{AddrName, AluImmOp, AluOp, AsmInst, BranchCond, MemAddr, MemWidth, Prog, Reg, ZeroTest};
pub use abi::{load_by_type, ssa_reg_to_reg, CallingConvention, Syscall};
pub use stream::{InstStream, PendingBranch};
pub use emit::{emit_instructions, render_listing};
