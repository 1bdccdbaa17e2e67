//! Operand helpers shared by value and block lowering

use rvssa_codegen::{ssa_reg_to_reg, AddrName, MemAddr, Reg};
use rvssa_common::LoweringError;
use rvssa_ir::{Aux, Func, Value};

/// Physical register assigned to `v`
pub fn reg_of(v: &Value) -> Result<Reg, LoweringError> {
    v.reg.map(ssa_reg_to_reg).ok_or_else(|| LoweringError::NoRegister {
        value: v.long_string(),
    })
}

/// The `index`th argument of `v`
pub fn arg<'f>(func: &'f Func, v: &Value, index: usize) -> Result<&'f Value, LoweringError> {
    let id = *v.args.get(index).ok_or_else(|| LoweringError::MissingArg {
        index,
        value: v.long_string(),
    })?;
    func.value(id).ok_or(LoweringError::MissingValue { id })
}

/// Physical register of the `index`th argument of `v`
pub fn arg_reg(func: &Func, v: &Value, index: usize) -> Result<Reg, LoweringError> {
    reg_of(arg(func, v, index)?)
}

/// Fold the symbol and constant offset of `v` into a memory operand.
///
/// The constant is always added. Argument slots additionally add the
/// variable's offset in the argument area; local slots are placed by the
/// frame layout pass, so only their name is recorded.
pub fn add_aux(addr: &mut MemAddr, v: &Value) -> Result<(), LoweringError> {
    addr.offset = add_offset(addr.offset, v.aux_int, v)?;
    match &v.aux {
        Aux::None => {}
        Aux::Extern(sym) => addr.name = AddrName::Extern(sym.clone()),
        Aux::Arg(var) => {
            addr.name = AddrName::Param(var.name.clone());
            addr.offset = add_offset(addr.offset, var.frame_offset, v)?;
        }
        Aux::Auto(var) => addr.name = AddrName::Auto(var.name.clone()),
        Aux::Var(_) => {
            return Err(LoweringError::BadAux {
                aux: v.aux.kind_name().to_string(),
                value: v.long_string(),
            })
        }
    }
    Ok(())
}

/// `base + delta` for a memory operand of `v`, failing instead of wrapping
pub fn add_offset(base: i64, delta: i64, v: &Value) -> Result<i64, LoweringError> {
    base.checked_add(delta).ok_or_else(|| LoweringError::OffsetOverflow {
        value: v.long_string(),
    })
}
