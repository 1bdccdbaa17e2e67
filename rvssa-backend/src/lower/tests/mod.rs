//! Tests for value, block and function lowering

mod block_tests;

use crate::liveness::{LivenessEvent, LivenessLog};
use crate::lower::{lower_block, lower_value};
use crate::state::GenState;
use crate::LoweringOptions;
use rvssa_codegen::{AsmInst, PendingBranch};
use rvssa_common::{BlockId, Gap, LoweringError, RegIndex, ValueId};
use rvssa_ir::Func;

pub(super) fn r(n: u8) -> RegIndex {
    RegIndex::new(n).unwrap()
}

/// What lowering a handful of values produced
pub(super) struct Lowered {
    pub insts: Vec<AsmInst>,
    pub gaps: Vec<Gap>,
    pub events: Vec<LivenessEvent>,
}

pub(super) fn lower_values_with(
    func: &Func,
    ids: &[ValueId],
    options: LoweringOptions,
) -> Result<Lowered, LoweringError> {
    let mut sink = LivenessLog::new();
    let (insts, gaps) = {
        let mut s = GenState::new(func, &options, &mut sink);
        for id in ids {
            lower_value(&mut s, func.value(*id).unwrap())?;
        }
        (s.stream().insts(), s.gaps().to_vec())
    };
    Ok(Lowered {
        insts,
        gaps,
        events: sink.into_events(),
    })
}

/// Lower a single value with default options and return its instructions
pub(super) fn lower_one(func: &Func, id: ValueId) -> Result<Vec<AsmInst>, LoweringError> {
    lower_values_with(func, &[id], LoweringOptions::default()).map(|l| l.insts)
}

/// Lower the terminator of `block` and return instructions and pending branches
pub(super) fn lower_terminator(
    func: &Func,
    block: BlockId,
    next: Option<BlockId>,
) -> Result<(Vec<AsmInst>, Vec<PendingBranch>), LoweringError> {
    let options = LoweringOptions::default();
    let mut sink = LivenessLog::new();
    let mut s = GenState::new(func, &options, &mut sink);
    lower_block(&mut s, func.block(block).unwrap(), next)?;
    Ok((s.stream().insts(), s.branches().to_vec()))
}
