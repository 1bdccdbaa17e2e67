//! RISC-V SSA backend - Common Types and Utilities
//!
//! This crate contains shared types, error definitions, and utilities
//! used across the IR model, the machine model and the lowering backend.

pub mod error;
pub mod types;
pub mod source_loc;

pub use error::{Gap, LoweringError};
pub use types::*;
pub use source_loc::SourcePos;
