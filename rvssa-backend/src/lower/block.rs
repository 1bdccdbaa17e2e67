//! Block Lowering - terminators and branch polarity
//!
//! A block's terminator is lowered after its values. `next` is the block
//! placed right after it in the final layout; reaching `next` costs nothing,
//! every other successor needs an explicit branch.

use log::{debug, trace};
use rvssa_codegen::{AsmInst, BranchCond};
use rvssa_common::{BlockId, LoweringError};
use rvssa_ir::{Block, BlockKind, Op, Value};

use super::helpers::arg_reg;
use crate::state::GenState;

/// Lower the terminator of `b`.
///
/// # Parameters
/// - `s`: code generation state of the enclosing function
/// - `b`: the block whose values have already been lowered
/// - `next`: the block that follows `b` in layout, if any
pub fn lower_block(s: &mut GenState, b: &Block, next: Option<BlockId>) -> Result<(), LoweringError> {
    s.set_pos(b.pos);
    debug!("Lowering terminator of {} (next: {:?})", b.long_string(), next);

    match b.kind {
        BlockKind::Plain | BlockKind::Call | BlockKind::Check => {
            let succ = single_succ(b)?;
            if Some(succ) != next {
                s.emit_branch(AsmInst::Jmp, succ);
            } else {
                trace!("  falls through to b{}", succ);
            }
        }

        BlockKind::Exit => {
            s.emit(AsmInst::Undef);
        }

        BlockKind::Ret => {
            s.emit(AsmInst::Ret);
        }

        BlockKind::Branch => lower_branch(s, b, next)?,

        BlockKind::If | BlockKind::Defer | BlockKind::First | BlockKind::RetJmp => {
            return Err(LoweringError::UnhandledKind {
                kind: b.kind.to_string(),
                block: b.long_string(),
            });
        }
    }

    Ok(())
}

fn single_succ(b: &Block) -> Result<BlockId, LoweringError> {
    match b.succs.as_slice() {
        [succ] => Ok(*succ),
        succs => Err(LoweringError::BadSuccessors {
            block: b.to_string(),
            kind: b.kind.to_string(),
            found: succs.len(),
            want: 1,
        }),
    }
}

/// Condition a branch marker op tests for
fn branch_cond(op: Op) -> Option<BranchCond> {
    match op {
        Op::Beq => Some(BranchCond::Eq),
        Op::Bne => Some(BranchCond::Ne),
        Op::Blt => Some(BranchCond::Lt),
        Op::Bltu => Some(BranchCond::Ltu),
        Op::Bge => Some(BranchCond::Ge),
        Op::Bgeu => Some(BranchCond::Geu),
        _ => None,
    }
}

/// The control value of a branch block, checked to be its own last value
fn control_value<'f>(s: &GenState<'f>, b: &Block) -> Result<&'f Value, LoweringError> {
    let id = b.control.ok_or_else(|| LoweringError::NoControl { block: b.long_string() })?;
    let v = s.func.value(id).ok_or(LoweringError::MissingValue { id })?;

    if v.block != b.id {
        return Err(LoweringError::MisplacedControl {
            owner: format!("b{}", v.block),
            block: b.to_string(),
            value: v.long_string(),
        });
    }
    if b.values.last() != Some(&id) {
        return Err(LoweringError::BadlyScheduledControl {
            block: b.to_string(),
            value: v.long_string(),
        });
    }
    Ok(v)
}

/// Conditional branch on the control value.
///
/// The branch jumps to whichever successor is not `next`. If `next` is the
/// true successor the condition is inverted; if it is neither, the false
/// successor gets an extra unconditional jump.
fn lower_branch(s: &mut GenState, b: &Block, next: Option<BlockId>) -> Result<(), LoweringError> {
    let v = control_value(s, b)?;
    let cond = branch_cond(v.op).ok_or_else(|| LoweringError::BadControlOp {
        block: b.to_string(),
        value: v.long_string(),
    })?;
    let (yes, no) = match b.succs.as_slice() {
        [yes, no] => (*yes, *no),
        succs => {
            return Err(LoweringError::BadSuccessors {
                block: b.to_string(),
                kind: b.kind.to_string(),
                found: succs.len(),
                want: 2,
            })
        }
    };
    let rs1 = arg_reg(s.func, v, 0)?;
    let rs2 = arg_reg(s.func, v, 1)?;

    if next == Some(yes) {
        trace!("  inverting {} to fall through to b{}", cond.mnemonic(), yes);
        s.emit_branch(AsmInst::Branch { cond: cond.invert(), rs1, rs2 }, no);
    } else if next == Some(no) {
        s.emit_branch(AsmInst::Branch { cond, rs1, rs2 }, yes);
    } else {
        s.emit_branch(AsmInst::Branch { cond, rs1, rs2 }, yes);
        s.emit_branch(AsmInst::Jmp, no);
    }
    Ok(())
}
