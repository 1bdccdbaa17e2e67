//! RISC-V SSA backend - Input IR
//!
//! The scheduled, register-allocated SSA form consumed by the lowering
//! stage, a builder for assembling it in code, and JSON loading.

pub mod ssa;
pub mod builder;
pub mod json;

pub use ssa::{Aux, Block, BlockKind, FrameVar, Func, Op, Slot, Value, VarClass};
pub use builder::{FuncBuilder, ValueBuilder};
pub use json::{func_to_json, load_func_json, validate, IrError};
