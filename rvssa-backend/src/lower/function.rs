//! Function Lowering - drives value and block lowering over a whole function

use log::{debug, info};
use rvssa_common::LoweringError;
use rvssa_ir::{Block, Func};

use super::block::lower_block;
use super::value::lower_value;
use crate::liveness::LivenessSink;
use crate::state::{FuncOutput, GenState};
use crate::LoweringOptions;

/// Lower a complete function.
///
/// Blocks are visited in layout order and each block's values in schedule
/// order. The first fatal error aborts the function; gaps are collected on
/// the output unless `options.fail_on_gap` is set.
pub fn lower_function(
    func: &Func,
    options: &LoweringOptions,
    sink: &mut dyn LivenessSink,
) -> Result<FuncOutput, LoweringError> {
    info!("Lowering function '{}' with {} blocks", func.name, func.blocks.len());

    let mut s = GenState::new(func, options, sink);

    for (i, block) in func.blocks.iter().enumerate() {
        mark_moves(block);
        s.start_block(block.id);

        for id in &block.values {
            let v = func.value(*id).ok_or(LoweringError::MissingValue { id: *id })?;
            lower_value(&mut s, v)?;
        }

        let next = func.blocks.get(i + 1).map(|b| b.id);
        lower_block(&mut s, block, next)?;
    }

    let out = s.finish();
    debug!(
        "Lowered '{}': {} instructions, {} pending branches, {} gaps",
        out.name,
        out.stream.len(),
        out.branches.len(),
        out.gaps.len()
    );
    Ok(out)
}

/// Constant materialization never has to be kept away from a flags register:
/// RV64 compares into general registers, so there is nothing to mark.
fn mark_moves(block: &Block) {
    debug!("mark_moves: nothing to mark in {}", block);
}
