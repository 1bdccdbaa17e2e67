//! Terminator lowering tests: fallthrough, jumps and branch polarity

use super::{lower_terminator, r};
use pretty_assertions::assert_eq;
use rvssa_codegen::{AsmInst, BranchCond, PendingBranch, Reg};
use rvssa_common::{BlockId, LoweringError, Type};
use rvssa_ir::{BlockKind, Func, FuncBuilder, Op};

/// Single-successor block `b0 -> b1`, followed in layout by `b1` and `b2`
fn single(kind: BlockKind) -> Func {
    let mut b = FuncBuilder::new("f");
    let b0 = b.block(kind);
    let b1 = b.block(BlockKind::Ret);
    b.block(BlockKind::Ret);
    b.edge(b0, b1);
    b.build()
}

/// `b0: if a0 <cond> a1 goto b1 else b2`, plus an unrelated block b3
fn branch(op: Op) -> Func {
    let mut b = FuncBuilder::new("f");
    let b0 = b.block(BlockKind::Branch);
    let yes = b.block(BlockKind::Ret);
    let no = b.block(BlockKind::Ret);
    b.block(BlockKind::Ret);
    let x = b.value(b0, Op::Arg, Type::I64, &[]).reg(r(10)).id();
    let y = b.value(b0, Op::Arg, Type::I64, &[]).reg(r(11)).id();
    let c = b.value(b0, op, Type::Flags, &[x, y]).id();
    b.control(b0, c).edge(b0, yes).edge(b0, no);
    b.build()
}

const CONDS: [(Op, BranchCond); 6] = [
    (Op::Beq, BranchCond::Eq),
    (Op::Bne, BranchCond::Ne),
    (Op::Blt, BranchCond::Lt),
    (Op::Bltu, BranchCond::Ltu),
    (Op::Bge, BranchCond::Ge),
    (Op::Bgeu, BranchCond::Geu),
];

fn bcc(cond: BranchCond) -> AsmInst {
    AsmInst::Branch { cond, rs1: Reg::X10, rs2: Reg::X11 }
}

fn pending(inst: usize, target: BlockId) -> PendingBranch {
    PendingBranch { inst, target }
}

#[test]
fn test_single_successor_falls_through() {
    for kind in [BlockKind::Plain, BlockKind::Call, BlockKind::Check] {
        let func = single(kind);
        let (insts, branches) = lower_terminator(&func, 0, Some(1)).unwrap();
        assert!(insts.is_empty(), "{} emitted {:?}", kind, insts);
        assert!(branches.is_empty());
    }
}

#[test]
fn test_single_successor_jumps_when_not_next() {
    for kind in [BlockKind::Plain, BlockKind::Call, BlockKind::Check] {
        let func = single(kind);
        for next in [Some(2), None] {
            let (insts, branches) = lower_terminator(&func, 0, next).unwrap();
            assert_eq!(insts, vec![AsmInst::Jmp]);
            assert_eq!(branches, vec![pending(0, 1)]);
        }
    }
}

#[test]
fn test_single_successor_count_is_checked() {
    let mut b = FuncBuilder::new("f");
    let b0 = b.block(BlockKind::Plain);
    let err = lower_terminator(&b.build(), b0, None).unwrap_err();
    assert_eq!(
        err,
        LoweringError::BadSuccessors {
            block: "b0".to_string(),
            kind: "Plain".to_string(),
            found: 0,
            want: 1,
        }
    );
}

#[test]
fn test_exit_and_return() {
    let mut b = FuncBuilder::new("f");
    let exit = b.block(BlockKind::Exit);
    let ret = b.block(BlockKind::Ret);
    let func = b.build();

    assert_eq!(lower_terminator(&func, exit, Some(ret)).unwrap(), (vec![AsmInst::Undef], vec![]));
    assert_eq!(lower_terminator(&func, ret, None).unwrap(), (vec![AsmInst::Ret], vec![]));
}

#[test]
fn test_branch_inverted_when_true_successor_is_next() {
    for (op, cond) in CONDS {
        let func = branch(op);
        let (insts, branches) = lower_terminator(&func, 0, Some(1)).unwrap();
        assert_eq!(insts, vec![bcc(cond.invert())], "{}", op);
        assert_eq!(branches, vec![pending(0, 2)]);
    }
}

#[test]
fn test_branch_kept_when_false_successor_is_next() {
    for (op, cond) in CONDS {
        let func = branch(op);
        let (insts, branches) = lower_terminator(&func, 0, Some(2)).unwrap();
        assert_eq!(insts, vec![bcc(cond)], "{}", op);
        assert_eq!(branches, vec![pending(0, 1)]);
    }
}

#[test]
fn test_branch_with_no_fallthrough_adds_jump() {
    for (op, cond) in CONDS {
        let func = branch(op);
        for next in [Some(3), None] {
            let (insts, branches) = lower_terminator(&func, 0, next).unwrap();
            assert_eq!(insts, vec![bcc(cond), AsmInst::Jmp], "{}", op);
            assert_eq!(branches, vec![pending(0, 1), pending(1, 2)]);
        }
    }
}

#[test]
fn test_control_in_wrong_block_is_fatal() {
    let mut b = FuncBuilder::new("f");
    let b0 = b.block(BlockKind::Branch);
    let b1 = b.block(BlockKind::Ret);
    let b2 = b.block(BlockKind::Ret);
    let x = b.value(b0, Op::Arg, Type::I64, &[]).reg(r(10)).id();
    let c = b.value(b1, Op::Beq, Type::Flags, &[x, x]).id();
    b.control(b0, c).edge(b0, b1).edge(b0, b2);
    let err = lower_terminator(&b.build(), b0, Some(b1)).unwrap_err();
    assert_eq!(err.class(), "misplaced-control");
    assert_eq!(
        err.to_string(),
        "control value in the wrong block b1, want b0: v1 = Beq <flags> v0 v0"
    );
}

#[test]
fn test_control_not_scheduled_last_is_fatal() {
    let mut b = FuncBuilder::new("f");
    let b0 = b.block(BlockKind::Branch);
    let b1 = b.block(BlockKind::Ret);
    let b2 = b.block(BlockKind::Ret);
    let x = b.value(b0, Op::Arg, Type::I64, &[]).reg(r(10)).id();
    let c = b.value(b0, Op::Bne, Type::Flags, &[x, x]).id();
    b.value(b0, Op::MovQconst, Type::I64, &[]).reg(r(5));
    b.control(b0, c).edge(b0, b1).edge(b0, b2);
    let err = lower_terminator(&b.build(), b0, Some(b1)).unwrap_err();
    assert!(matches!(err, LoweringError::BadlyScheduledControl { .. }), "{}", err);
}

#[test]
fn test_control_must_be_a_branch_condition() {
    let mut b = FuncBuilder::new("f");
    let b0 = b.block(BlockKind::Branch);
    let b1 = b.block(BlockKind::Ret);
    let b2 = b.block(BlockKind::Ret);
    let x = b.value(b0, Op::Arg, Type::I64, &[]).reg(r(10)).id();
    let c = b.value(b0, Op::Sltu, Type::Bool, &[x, x]).reg(r(5)).id();
    b.control(b0, c).edge(b0, b1).edge(b0, b2);
    let err = lower_terminator(&b.build(), b0, Some(b1)).unwrap_err();
    assert!(matches!(err, LoweringError::BadControlOp { .. }), "{}", err);

    let mut b = FuncBuilder::new("f");
    let b0 = b.block(BlockKind::Branch);
    let err = lower_terminator(&b.build(), b0, None).unwrap_err();
    assert!(matches!(err, LoweringError::NoControl { .. }), "{}", err);
}

#[test]
fn test_generic_kinds_are_unhandled() {
    for kind in [BlockKind::If, BlockKind::Defer, BlockKind::First, BlockKind::RetJmp] {
        let func = single(kind);
        let err = lower_terminator(&func, 0, Some(1)).unwrap_err();
        assert_eq!(err.to_string(), format!("Unhandled kind {}: b0 {} -> b1", kind, kind));
    }
}
