//! Built-in demo functions for trying the backend without an IR file

use rvssa_common::{RegIndex, Type};
use rvssa_ir::{Aux, BlockKind, FrameVar, Func, FuncBuilder, Op, Slot};

pub const NAMES: [&str; 3] = ["exit", "max", "sum"];

pub fn demo(name: &str) -> Option<Func> {
    match name {
        "exit" => Some(exit_demo()),
        "max" => Some(max_demo()),
        "sum" => Some(sum_demo()),
        _ => None,
    }
}

/// `exit(42)`
fn exit_demo() -> Func {
    let mut b = FuncBuilder::new("main");
    let entry = b.block(BlockKind::Exit);
    let mem = b.value(entry, Op::InitMem, Type::Mem, &[]).id();
    let rc = b.value(entry, Op::MovQconst, Type::I64, &[]).aux_int(42).line(1).reg(RegIndex::S1).id();
    b.value(entry, Op::LoweredExitProc, Type::Mem, &[rc, mem]).line(1);
    b.build()
}

/// `max(x, y)`, returning in a0
fn max_demo() -> Func {
    let mut b = FuncBuilder::new("max");
    let entry = b.block(BlockKind::Branch);
    let take_y = b.block(BlockKind::Plain);
    let ret = b.block(BlockKind::Ret);

    let x = b.value(entry, Op::Arg, Type::I64, &[]).reg(RegIndex::A0).id();
    let y = b.value(entry, Op::Arg, Type::I64, &[]).reg(RegIndex::A1).id();
    let ge = b.value(entry, Op::Bge, Type::Flags, &[x, y]).line(2).id();
    b.control(entry, ge).edge(entry, ret).edge(entry, take_y).block_line(entry, 2);

    b.value(take_y, Op::Copy, Type::I64, &[y]).line(3).reg(RegIndex::A0);
    b.edge(take_y, ret).block_line(take_y, 3);
    b.block_line(ret, 5);
    b.build()
}

/// Adds a spilled parameter to a global counter and stores it back
fn sum_demo() -> Func {
    let mut b = FuncBuilder::new("sum");
    let entry = b.block(BlockKind::Ret);

    let mem = b.value(entry, Op::InitMem, Type::Mem, &[]).id();
    let sb = b.value(entry, Op::SB, Type::Ptr, &[]).reg(RegIndex::GP).id();
    let n = b.value(entry, Op::Arg, Type::I64, &[]).id();
    b.slot(n, Slot { var: FrameVar::param("n", 0), offset: 0 });

    let total = Aux::Extern("total".to_string());
    let addr = b.value(entry, Op::MovMem, Type::Ptr, &[sb]).aux(total).line(2).reg(RegIndex::T0).id();
    let old = b.value(entry, Op::MovLoad, Type::I64, &[addr, mem]).line(2).reg(RegIndex::T1).id();
    let reload = b.value(entry, Op::LoadReg, Type::I64, &[n]).line(2).reg(RegIndex::T2).id();
    let sum = b.value(entry, Op::Add, Type::I64, &[old, reload]).line(2).reg(RegIndex::T1).id();
    b.value(entry, Op::MovStore, Type::Mem, &[addr, sum, mem]).line(2);
    b.block_line(entry, 3);
    b.build()
}
