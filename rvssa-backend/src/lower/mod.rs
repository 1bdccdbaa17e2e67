//! Lowering of SSA values and blocks to RISC-V instructions
//!
//! Values are lowered one at a time in schedule order, then the block
//! terminator is lowered with knowledge of which block follows in layout.

mod helpers;
mod value;
mod block;
mod function;

pub use value::lower_value;
pub use block::lower_block;
pub use function::lower_function;

#[cfg(test)]
mod tests;
