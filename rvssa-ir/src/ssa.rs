//! Scheduled, register-allocated SSA form
//!
//! This is the input of the RISC-V lowering stage. Everything here has
//! already been through the machine-independent pipeline: ops are lowered to
//! RISC-V ops where possible, values are scheduled inside their blocks, blocks
//! are in final layout order and every value that lives in a register carries
//! the allocator's register index.

use rvssa_common::{BlockId, RegIndex, SourcePos, Type, ValueId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// SSA operations.
///
/// The set is closed: the lowering table matches it without a wildcard, so a
/// new op must be classified there before the backend compiles again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    // Generic ops that need no code on any target
    InitMem,
    Arg,
    Phi,
    Copy,
    SP,
    SB,
    LoadReg,
    StoreReg,
    VarDef,
    VarKill,
    VarLive,

    // Generic ops that must have been rewritten into RISC-V ops upstream
    Add64,
    Mul64,
    Const64,
    Load,
    Store,
    Zero,
    Move,
    StaticCall,

    // RISC-V register-register ALU
    Add,
    Sub,
    Xor,
    Or,
    And,
    Slt,
    Sltu,

    // RISC-V register-immediate ALU
    AddI,
    XorI,
    OrI,
    AndI,
    SllI,

    // RISC-V constants and moves
    MovBconst,
    MovWconst,
    MovLconst,
    MovQconst,
    MovConvert,
    MovMem,
    MovLoad,
    MovStore,

    Seqz,
    Snez,

    // Branch conditions, only valid as control values of Branch blocks
    Beq,
    Bne,
    Blt,
    Bltu,
    Bge,
    Bgeu,

    LoweredNilCheck,
    LoweredExitProc,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Unconditional fallthrough to one successor
    Plain,
    /// Block ending in a call, one successor
    Call,
    /// Block ending in a runtime check, one successor
    Check,
    /// Function return
    Ret,
    /// Process exit, never continues
    Exit,
    /// RISC-V conditional branch on the control value
    Branch,

    // Generic kinds that must have been rewritten upstream
    If,
    Defer,
    First,
    RetJmp,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Storage class of a frame variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarClass {
    /// Incoming parameter
    Param,
    /// Result parameter
    ParamOut,
    /// Local
    Auto,
}

impl VarClass {
    /// Check if the variable lives in the argument area of the frame
    pub fn is_param(&self) -> bool {
        matches!(self, VarClass::Param | VarClass::ParamOut)
    }
}

/// A variable with a fixed place in the stack frame
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameVar {
    pub name: String,
    pub class: VarClass,
    /// Offset of the variable within its frame area
    #[serde(default)]
    pub frame_offset: i64,
}

impl FrameVar {
    pub fn new(name: &str, class: VarClass, frame_offset: i64) -> Self {
        Self {
            name: name.to_string(),
            class,
            frame_offset,
        }
    }

    pub fn auto(name: &str) -> Self {
        Self::new(name, VarClass::Auto, 0)
    }

    pub fn param(name: &str, frame_offset: i64) -> Self {
        Self::new(name, VarClass::Param, frame_offset)
    }
}

/// Symbolic auxiliary payload of a value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aux {
    #[default]
    None,
    /// Global symbol
    Extern(String),
    /// Argument slot of the current function
    Arg(FrameVar),
    /// Local slot of the current function
    Auto(FrameVar),
    /// Frame variable named by a liveness marker
    Var(FrameVar),
}

impl Aux {
    /// Name of the payload kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Aux::None => "none",
            Aux::Extern(_) => "extern",
            Aux::Arg(_) => "arg",
            Aux::Auto(_) => "auto",
            Aux::Var(_) => "var",
        }
    }
}

impl fmt::Display for Aux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aux::None => write!(f, "none"),
            Aux::Extern(sym) => write!(f, "{}", sym),
            Aux::Arg(var) | Aux::Auto(var) | Aux::Var(var) => write!(f, "{}", var.name),
        }
    }
}

/// Stack slot assigned to a spilled value by the stack allocator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub var: FrameVar,
    /// Offset of the slot within the variable
    #[serde(default)]
    pub offset: i64,
}

/// An SSA value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub id: ValueId,
    pub op: Op,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub args: Vec<ValueId>,
    #[serde(default)]
    pub aux_int: i64,
    #[serde(default)]
    pub aux: Aux,
    /// Register assigned by the allocator, if the value lives in one
    #[serde(default)]
    pub reg: Option<RegIndex>,
    /// Owning block
    pub block: BlockId,
    #[serde(default)]
    pub pos: SourcePos,
}

impl Value {
    /// Full description used in fatal diagnostics, e.g.
    /// `v7 = Add <int64> v3 v4 : r5`
    pub fn long_string(&self) -> String {
        let mut s = format!("v{} = {} <{}>", self.id, self.op, self.ty);
        for arg in &self.args {
            s.push_str(&format!(" v{}", arg));
        }
        if self.aux_int != 0 {
            s.push_str(&format!(" [{}]", self.aux_int));
        }
        if self.aux != Aux::None {
            s.push_str(&format!(" {{{}}}", self.aux));
        }
        if let Some(reg) = self.reg {
            s.push_str(&format!(" : {}", reg));
        }
        s
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.id)
    }
}

/// A basic block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Values in schedule order
    #[serde(default)]
    pub values: Vec<ValueId>,
    /// Value deciding a conditional branch
    #[serde(default)]
    pub control: Option<ValueId>,
    #[serde(default)]
    pub succs: Vec<BlockId>,
    #[serde(default)]
    pub pos: SourcePos,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            values: Vec::new(),
            control: None,
            succs: Vec::new(),
            pos: SourcePos::unknown(),
        }
    }

    /// Description used in fatal diagnostics
    pub fn long_string(&self) -> String {
        let mut s = format!("b{} {}", self.id, self.kind);
        if let Some(c) = self.control {
            s.push_str(&format!(" v{}", c));
        }
        if !self.succs.is_empty() {
            s.push_str(" ->");
            for succ in &self.succs {
                s.push_str(&format!(" b{}", succ));
            }
        }
        s
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.id)
    }
}

/// A function ready for lowering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Func {
    pub name: String,
    /// Value arena, indexed by value id
    pub values: Vec<Value>,
    /// Blocks in final layout order
    pub blocks: Vec<Block>,
    /// Stack slots of spilled values
    #[serde(default)]
    pub slots: BTreeMap<ValueId, Slot>,
}

impl Func {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::new(),
            blocks: Vec::new(),
            slots: BTreeMap::new(),
        }
    }

    pub fn value(&self, id: ValueId) -> Option<&Value> {
        self.values.get(id as usize)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Stack slot of a spilled value
    pub fn slot(&self, id: ValueId) -> Option<&Slot> {
        self.slots.get(&id)
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "func {}", self.name)?;
        for block in &self.blocks {
            writeln!(f, "  {}:", block.long_string())?;
            for id in &block.values {
                match self.value(*id) {
                    Some(v) => writeln!(f, "    {}", v.long_string())?,
                    None => writeln!(f, "    v{} = <missing>", id)?,
                }
            }
        }
        Ok(())
    }
}
