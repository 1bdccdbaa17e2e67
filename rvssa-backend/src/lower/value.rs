//! Value Lowering - per-opcode instruction selection
//!
//! Every op in [`Op`] is classified here. The match has no wildcard arm, so
//! an op added to the IR does not compile until it is given a lowering or
//! explicitly rejected.

use log::{debug, trace};
use rvssa_codegen::{
    load_by_type, AluImmOp, AluOp, AsmInst, CallingConvention, MemAddr, AddrName, Reg, Syscall, ZeroTest,
};
use rvssa_common::{Gap, LoweringError};
use rvssa_ir::{Aux, Func, Op, Value};

use super::helpers::{add_aux, add_offset, arg, arg_reg, reg_of};
use crate::state::GenState;

/// Lower a single value, appending its instructions to the stream.
///
/// # Parameters
/// - `s`: code generation state of the enclosing function
/// - `v`: the value, which must belong to `s`'s function
///
/// # Returns
/// `Ok(())` when the value was lowered or recorded as a gap, or the fatal
/// error describing why the value cannot be lowered.
pub fn lower_value(s: &mut GenState, v: &Value) -> Result<(), LoweringError> {
    let func = s.func;
    s.set_pos(v.pos);
    debug!("Lowering {}", v.long_string());

    match v.op {
        Op::InitMem | Op::Arg | Op::SP | Op::SB => {
            trace!("  {} needs no code", v.op);
        }

        Op::Phi => check_lowered_phi(func, v)?,

        Op::Copy | Op::MovConvert => lower_copy(s, v)?,

        Op::LoadReg => lower_load_reg(s, v)?,
        Op::StoreReg => lower_store_reg(s, v)?,

        Op::VarDef | Op::VarKill | Op::VarLive => lower_liveness(s, v)?,

        Op::Add => lower_alu(s, v, AluOp::Add)?,
        Op::Sub => lower_alu(s, v, AluOp::Sub)?,
        Op::Xor => lower_alu(s, v, AluOp::Xor)?,
        Op::Or => lower_alu(s, v, AluOp::Or)?,
        Op::And => lower_alu(s, v, AluOp::And)?,
        Op::Slt => lower_alu(s, v, AluOp::Slt)?,
        Op::Sltu => lower_alu(s, v, AluOp::Sltu)?,

        Op::AddI => lower_alu_imm(s, v, AluImmOp::AddI)?,
        Op::XorI => lower_alu_imm(s, v, AluImmOp::XorI)?,
        Op::OrI => lower_alu_imm(s, v, AluImmOp::OrI)?,
        Op::AndI => lower_alu_imm(s, v, AluImmOp::AndI)?,
        Op::SllI => lower_alu_imm(s, v, AluImmOp::SllI)?,

        Op::MovBconst | Op::MovWconst | Op::MovLconst | Op::MovQconst => {
            let rd = reg_of(v)?;
            s.emit(AsmInst::Li(rd, v.aux_int));
        }

        Op::MovMem => lower_address(s, v)?,

        Op::MovLoad => {
            let width = load_by_type(&v.ty)?;
            let mut addr = MemAddr::reg(arg_reg(func, v, 0)?, 0);
            add_aux(&mut addr, v)?;
            let rd = reg_of(v)?;
            s.emit(AsmInst::Load { width, rd, addr });
        }

        Op::MovStore => {
            // The stored value's type picks the width; the store itself is a memory token
            let src = arg(func, v, 1)?;
            let width = load_by_type(&src.ty)?;
            let mut addr = MemAddr::reg(arg_reg(func, v, 0)?, 0);
            add_aux(&mut addr, v)?;
            let rs = reg_of(src)?;
            s.emit(AsmInst::Store { width, rs, addr });
        }

        Op::Seqz => lower_zero_test(s, v, ZeroTest::Seqz)?,
        Op::Snez => lower_zero_test(s, v, ZeroTest::Snez)?,

        Op::Beq | Op::Bne | Op::Blt | Op::Bltu | Op::Bge | Op::Bgeu => {
            // Control markers; the branch itself is issued by block lowering
            trace!("  {} deferred to block terminator", v.op);
        }

        Op::LoweredNilCheck => {
            s.gap(Gap::unimplemented("LoweredNilCheck", v.long_string()))?;
        }

        Op::LoweredExitProc => lower_exit_proc(s, v)?,

        Op::Add64
        | Op::Mul64
        | Op::Const64
        | Op::Load
        | Op::Store
        | Op::Zero
        | Op::Move
        | Op::StaticCall => {
            return Err(LoweringError::UnhandledOp {
                op: v.op.to_string(),
                value: v.long_string(),
            });
        }
    }

    Ok(())
}

/// Phis must have been turned into register agreement by the allocator:
/// every argument already sits in the phi's register.
fn check_lowered_phi(func: &Func, v: &Value) -> Result<(), LoweringError> {
    if v.ty.is_memory() {
        return Ok(());
    }
    for index in 0..v.args.len() {
        let a = arg(func, v, index)?;
        if a.reg != v.reg {
            return Err(LoweringError::PhiNotLowered {
                phi_reg: reg_name(v),
                arg_reg: reg_name(a),
                value: v.long_string(),
            });
        }
    }
    Ok(())
}

fn reg_name(v: &Value) -> String {
    match reg_of(v) {
        Ok(reg) => reg.to_string(),
        Err(_) => "none".to_string(),
    }
}

fn lower_copy(s: &mut GenState, v: &Value) -> Result<(), LoweringError> {
    if v.ty.is_memory() {
        return Ok(());
    }
    let rs = arg_reg(s.func, v, 0)?;
    let rd = reg_of(v)?;
    if rs == rd {
        trace!("  copy {} -> {} elided", rs, rd);
        return Ok(());
    }
    if v.ty.is_float() {
        return Err(LoweringError::FloatUnsupported {
            what: format!("float copy: {}", v.long_string()),
        });
    }
    s.emit(AsmInst::Mov(rd, rs));
    Ok(())
}

/// Reload a spilled value from its stack slot
fn lower_load_reg(s: &mut GenState, v: &Value) -> Result<(), LoweringError> {
    if v.ty.is_flags() {
        return s.gap(Gap::unimplemented("load flags", v.long_string()));
    }
    let width = load_by_type(&v.ty)?;
    let spilled = arg(s.func, v, 0)?;
    let addr = slot_addr(s.func, spilled)?;
    let rd = reg_of(v)?;
    s.emit(AsmInst::Load { width, rd, addr });
    Ok(())
}

/// Spill a register value into the stack slot assigned to `v`
fn lower_store_reg(s: &mut GenState, v: &Value) -> Result<(), LoweringError> {
    if v.ty.is_flags() {
        return s.gap(Gap::unimplemented("store flags", v.long_string()));
    }
    let width = load_by_type(&v.ty)?;
    let rs = arg_reg(s.func, v, 0)?;
    let addr = slot_addr(s.func, v)?;
    s.emit(AsmInst::Store { width, rs, addr });
    Ok(())
}

/// Frame operand of the stack slot holding `spilled`.
///
/// Parameters live in the caller's argument area, so their offset within it
/// is added to the slot offset; locals are named relative to this frame.
fn slot_addr(func: &Func, spilled: &Value) -> Result<MemAddr, LoweringError> {
    let slot = func.slot(spilled.id).ok_or_else(|| LoweringError::MissingSlot {
        value: spilled.long_string(),
    })?;
    let var = &slot.var;
    let addr = if var.class.is_param() {
        let offset = add_offset(slot.offset, var.frame_offset, spilled)?;
        MemAddr::frame(AddrName::Param(var.name.clone()), offset)
    } else {
        MemAddr::frame(AddrName::Auto(var.name.clone()), slot.offset)
    };
    Ok(addr)
}

/// Forward a liveness marker to the sink; any other op is rejected
pub(super) fn lower_liveness(s: &mut GenState, v: &Value) -> Result<(), LoweringError> {
    let var = match &v.aux {
        Aux::Var(var) => var,
        other => {
            return Err(LoweringError::BadAux {
                aux: other.kind_name().to_string(),
                value: v.long_string(),
            })
        }
    };
    let at = s.stream().len();
    match v.op {
        Op::VarDef => s.sink.var_def(var, at),
        Op::VarKill => s.sink.var_kill(var, at),
        Op::VarLive => s.sink.var_live(var, at),
        _ => {
            return Err(LoweringError::UnhandledOp {
                op: v.op.to_string(),
                value: v.long_string(),
            })
        }
    }
    Ok(())
}

fn lower_alu(s: &mut GenState, v: &Value, op: AluOp) -> Result<(), LoweringError> {
    let rs1 = arg_reg(s.func, v, 0)?;
    let rs2 = arg_reg(s.func, v, 1)?;
    let rd = reg_of(v)?;
    s.emit(AsmInst::Alu { op, rd, rs1, rs2 });
    Ok(())
}

fn lower_alu_imm(s: &mut GenState, v: &Value, op: AluImmOp) -> Result<(), LoweringError> {
    let rs1 = arg_reg(s.func, v, 0)?;
    let rd = reg_of(v)?;
    s.emit(AsmInst::AluImm { op, rd, rs1, imm: v.aux_int });
    Ok(())
}

fn lower_zero_test(s: &mut GenState, v: &Value, op: ZeroTest) -> Result<(), LoweringError> {
    let rs = arg_reg(s.func, v, 0)?;
    let rd = reg_of(v)?;
    s.emit(AsmInst::ZeroTest { op, rd, rs });
    Ok(())
}

/// Materialize the address of a symbol or frame offset.
///
/// Externs are addressed from the global base, everything else from the
/// stack pointer. Arg0 is the SB or SP pseudo-value the address is based on.
fn lower_address(s: &mut GenState, v: &Value) -> Result<(), LoweringError> {
    let base = match &v.aux {
        Aux::Extern(_) => CallingConvention::GLOBAL_BASE,
        Aux::Arg(_) | Aux::Auto(_) | Aux::None => CallingConvention::STACK_PTR,
        Aux::Var(_) => {
            return Err(LoweringError::BadAux {
                aux: v.aux.kind_name().to_string(),
                value: v.long_string(),
            })
        }
    };

    if s.options.check_base_reg {
        check_base_reg(s.func, v, base)?;
    }

    let mut addr = MemAddr::reg(base, 0);
    add_aux(&mut addr, v)?;
    let rd = reg_of(v)?;
    s.emit(AsmInst::La(rd, addr));
    Ok(())
}

fn check_base_reg(func: &Func, v: &Value, want: Reg) -> Result<(), LoweringError> {
    let found = arg_reg(func, v, 0)?;
    if found != want {
        return Err(LoweringError::BadBaseReg {
            found: found.to_string(),
            want: want.to_string(),
            aux: v.aux.kind_name().to_string(),
            value: v.long_string(),
        });
    }
    Ok(())
}

/// exit_group(rc): the only way a lowered program terminates
fn lower_exit_proc(s: &mut GenState, v: &Value) -> Result<(), LoweringError> {
    let rc = arg_reg(s.func, v, 0)?;
    s.emit(AsmInst::Mov(Syscall::ARG0, rc));
    s.emit(AsmInst::Li(Syscall::NUMBER, Syscall::SYS_EXIT_GROUP));
    s.emit(AsmInst::Ecall);
    Ok(())
}
