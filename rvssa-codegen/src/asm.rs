//! RISC-V Assembly Instruction Definitions
//!
//! This module defines the integer register file and the subset of the RV64I
//! instruction set that SSA lowering emits.

use rvssa_common::SourcePos;
use std::fmt;

/// RV64 integer register file.
///
/// Variants are the architectural names x0..x31; `Display` prints the
/// standard ABI mnemonic (zero, ra, sp, gp, tp, t0-t6, s0-s11, a0-a7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reg {
    X0, X1, X2, X3, X4, X5, X6, X7,
    X8, X9, X10, X11, X12, X13, X14, X15,
    X16, X17, X18, X19, X20, X21, X22, X23,
    X24, X25, X26, X27, X28, X29, X30, X31,
}

impl Reg {
    pub const SP: Reg = Reg::X2;
    pub const GP: Reg = Reg::X3;
    pub const A0: Reg = Reg::X10;
    pub const A7: Reg = Reg::X17;

    /// All registers in architectural order
    pub const ALL: [Reg; 32] = [
        Reg::X0, Reg::X1, Reg::X2, Reg::X3, Reg::X4, Reg::X5, Reg::X6, Reg::X7,
        Reg::X8, Reg::X9, Reg::X10, Reg::X11, Reg::X12, Reg::X13, Reg::X14, Reg::X15,
        Reg::X16, Reg::X17, Reg::X18, Reg::X19, Reg::X20, Reg::X21, Reg::X22, Reg::X23,
        Reg::X24, Reg::X25, Reg::X26, Reg::X27, Reg::X28, Reg::X29, Reg::X30, Reg::X31,
    ];

    /// Architectural register number (the `n` in `xn`)
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Reg> {
        Reg::ALL.get(n as usize).copied()
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reg::X0 => write!(f, "zero"),
            Reg::X1 => write!(f, "ra"),
            Reg::X2 => write!(f, "sp"),
            Reg::X3 => write!(f, "gp"),
            Reg::X4 => write!(f, "tp"),
            Reg::X5 => write!(f, "t0"),
            Reg::X6 => write!(f, "t1"),
            Reg::X7 => write!(f, "t2"),
            Reg::X8 => write!(f, "s0"),
            Reg::X9 => write!(f, "s1"),
            Reg::X10 => write!(f, "a0"),
            Reg::X11 => write!(f, "a1"),
            Reg::X12 => write!(f, "a2"),
            Reg::X13 => write!(f, "a3"),
            Reg::X14 => write!(f, "a4"),
            Reg::X15 => write!(f, "a5"),
            Reg::X16 => write!(f, "a6"),
            Reg::X17 => write!(f, "a7"),
            Reg::X18 => write!(f, "s2"),
            Reg::X19 => write!(f, "s3"),
            Reg::X20 => write!(f, "s4"),
            Reg::X21 => write!(f, "s5"),
            Reg::X22 => write!(f, "s6"),
            Reg::X23 => write!(f, "s7"),
            Reg::X24 => write!(f, "s8"),
            Reg::X25 => write!(f, "s9"),
            Reg::X26 => write!(f, "s10"),
            Reg::X27 => write!(f, "s11"),
            Reg::X28 => write!(f, "t3"),
            Reg::X29 => write!(f, "t4"),
            Reg::X30 => write!(f, "t5"),
            Reg::X31 => write!(f, "t6"),
        }
    }
}

/// Register-register ALU operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Sub,
    Xor,
    Or,
    And,
    Slt,
    Sltu,
}

impl AluOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::Xor => "XOR",
            AluOp::Or => "OR",
            AluOp::And => "AND",
            AluOp::Slt => "SLT",
            AluOp::Sltu => "SLTU",
        }
    }
}

/// Register-immediate ALU operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluImmOp {
    AddI,
    XorI,
    OrI,
    AndI,
    SllI,
}

impl AluImmOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            AluImmOp::AddI => "ADDI",
            AluImmOp::XorI => "XORI",
            AluImmOp::OrI => "ORI",
            AluImmOp::AndI => "ANDI",
            AluImmOp::SllI => "SLLI",
        }
    }
}

/// Set-if-zero / set-if-nonzero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZeroTest {
    Seqz,
    Snez,
}

impl ZeroTest {
    pub fn mnemonic(self) -> &'static str {
        match self {
            ZeroTest::Seqz => "SEQZ",
            ZeroTest::Snez => "SNEZ",
        }
    }
}

/// Conditional branch conditions (compare two registers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchCond {
    Eq,
    Ne,
    Lt,
    Ltu,
    Ge,
    Geu,
}

impl BranchCond {
    /// The condition that is true exactly when `self` is false
    pub fn invert(self) -> BranchCond {
        match self {
            BranchCond::Eq => BranchCond::Ne,
            BranchCond::Ne => BranchCond::Eq,
            BranchCond::Lt => BranchCond::Ge,
            BranchCond::Ge => BranchCond::Lt,
            BranchCond::Ltu => BranchCond::Geu,
            BranchCond::Geu => BranchCond::Ltu,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            BranchCond::Eq => "BEQ",
            BranchCond::Ne => "BNE",
            BranchCond::Lt => "BLT",
            BranchCond::Ltu => "BLTU",
            BranchCond::Ge => "BGE",
            BranchCond::Geu => "BGEU",
        }
    }
}

/// Width of a memory access, selected by operand byte size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemWidth {
    Byte,
    Half,
    Word,
    Double,
}

impl MemWidth {
    pub fn load_mnemonic(self) -> &'static str {
        match self {
            MemWidth::Byte => "LB",
            MemWidth::Half => "LH",
            MemWidth::Word => "LW",
            MemWidth::Double => "LD",
        }
    }

    pub fn store_mnemonic(self) -> &'static str {
        match self {
            MemWidth::Byte => "SB",
            MemWidth::Half => "SH",
            MemWidth::Word => "SW",
            MemWidth::Double => "SD",
        }
    }
}

/// Symbolic part of a memory operand
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddrName {
    /// Plain register + offset
    None,
    /// Global symbol, addressed from the global base register
    Extern(String),
    /// Incoming argument slot in the caller's frame
    Param(String),
    /// Local slot in this function's frame
    Auto(String),
}

/// Memory operand: `name+offset(base)`.
///
/// Frame slots of spill reloads have no base register; the name class selects
/// the frame (`FP` pseudo-base for params, `SP` for locals) and the final
/// frame layout pass rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemAddr {
    pub base: Option<Reg>,
    pub name: AddrName,
    pub offset: i64,
}

impl MemAddr {
    /// `offset(base)`
    pub fn reg(base: Reg, offset: i64) -> Self {
        Self { base: Some(base), name: AddrName::None, offset }
    }

    /// Frame slot addressed by name only
    pub fn frame(name: AddrName, offset: i64) -> Self {
        Self { base: None, name, offset }
    }
}

impl fmt::Display for MemAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sym, pseudo_base) = match &self.name {
            AddrName::None => (None, None),
            AddrName::Extern(s) => (Some(s.as_str()), Some("SB")),
            AddrName::Param(s) => (Some(s.as_str()), Some("FP")),
            AddrName::Auto(s) => (Some(s.as_str()), Some("SP")),
        };
        match sym {
            Some(s) if self.offset == 0 => write!(f, "{}", s)?,
            Some(s) => write!(f, "{}{:+}", s, self.offset)?,
            None => write!(f, "{}", self.offset)?,
        }
        match (self.base, pseudo_base) {
            (Some(reg), _) => write!(f, "({})", reg),
            (None, Some(pseudo)) => write!(f, "({})", pseudo),
            (None, None) => Ok(()),
        }
    }
}

/// RISC-V Assembly Instructions
///
/// Branch and jump targets are not part of the instruction: they are recorded
/// as pending branches next to the instruction stream and resolved by the
/// patching pass once the layout of the whole function is final.
#[derive(Debug, Clone, PartialEq)]
pub enum AsmInst {
    /// rd = rs1 op rs2
    Alu { op: AluOp, rd: Reg, rs1: Reg, rs2: Reg },
    /// rd = rs1 op imm
    AluImm { op: AluImmOp, rd: Reg, rs1: Reg, imm: i64 },
    /// rd = imm
    Li(Reg, i64),
    /// rd = rs
    Mov(Reg, Reg),
    /// rd = address of operand
    La(Reg, MemAddr),
    /// rd = memory[addr]
    Load { width: MemWidth, rd: Reg, addr: MemAddr },
    /// memory[addr] = rs
    Store { width: MemWidth, rs: Reg, addr: MemAddr },
    /// rd = (rs == 0) or (rs != 0)
    ZeroTest { op: ZeroTest, rd: Reg, rs: Reg },
    /// if rs1 cond rs2 goto <pending>
    Branch { cond: BranchCond, rs1: Reg, rs2: Reg },
    /// goto <pending>
    Jmp,
    /// Supervisor call
    Ecall,
    /// Undefined instruction trap
    Undef,
    Ret,
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::Alu { op, rd, rs1, rs2 } => write!(f, "{} {}, {}, {}", op.mnemonic(), rd, rs1, rs2),
            AsmInst::AluImm { op, rd, rs1, imm } => write!(f, "{} {}, {}, {}", op.mnemonic(), rd, rs1, imm),
            AsmInst::Li(rd, imm) => write!(f, "LI {}, {}", rd, imm),
            AsmInst::Mov(rd, rs) => write!(f, "MOV {}, {}", rd, rs),
            AsmInst::La(rd, addr) => write!(f, "LA {}, {}", rd, addr),
            AsmInst::Load { width, rd, addr } => write!(f, "{} {}, {}", width.load_mnemonic(), rd, addr),
            AsmInst::Store { width, rs, addr } => write!(f, "{} {}, {}", width.store_mnemonic(), rs, addr),
            AsmInst::ZeroTest { op, rd, rs } => write!(f, "{} {}, {}", op.mnemonic(), rd, rs),
            AsmInst::Branch { cond, rs1, rs2 } => write!(f, "{} {}, {}", cond.mnemonic(), rs1, rs2),
            AsmInst::Jmp => write!(f, "JMP"),
            AsmInst::Ecall => write!(f, "ECALL"),
            AsmInst::Undef => write!(f, "UNIMP"),
            AsmInst::Ret => write!(f, "RET"),
        }
    }
}

/// An emitted instruction together with the source position it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Prog {
    pub inst: AsmInst,
    pub pos: SourcePos,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_display() {
        assert_eq!(format!("{}", Reg::X0), "zero");
        assert_eq!(format!("{}", Reg::SP), "sp");
        assert_eq!(format!("{}", Reg::A0), "a0");
        assert_eq!(format!("{}", Reg::A7), "a7");
        assert_eq!(format!("{}", Reg::X31), "t6");
    }

    #[test]
    fn test_register_numbering() {
        for (n, reg) in Reg::ALL.iter().enumerate() {
            assert_eq!(reg.number() as usize, n);
            assert_eq!(Reg::from_number(n as u8), Some(*reg));
        }
        assert_eq!(Reg::from_number(32), None);
    }

    #[test]
    fn test_branch_inversion_is_an_involution() {
        let all = [BranchCond::Eq, BranchCond::Ne, BranchCond::Lt, BranchCond::Ltu, BranchCond::Ge, BranchCond::Geu];
        for cond in all {
            assert_ne!(cond.invert(), cond);
            assert_eq!(cond.invert().invert(), cond);
        }
        assert_eq!(BranchCond::Lt.invert(), BranchCond::Ge);
        assert_eq!(BranchCond::Ltu.invert(), BranchCond::Geu);
    }

    #[test]
    fn test_instruction_display() {
        let add = AsmInst::Alu { op: AluOp::Add, rd: Reg::X5, rs1: Reg::X6, rs2: Reg::X7 };
        assert_eq!(format!("{}", add), "ADD t0, t1, t2");
        let addi = AsmInst::AluImm { op: AluImmOp::AddI, rd: Reg::X5, rs1: Reg::X5, imm: -8 };
        assert_eq!(format!("{}", addi), "ADDI t0, t0, -8");
        assert_eq!(format!("{}", AsmInst::Li(Reg::A7, 94)), "LI a7, 94");
        assert_eq!(format!("{}", AsmInst::Mov(Reg::A0, Reg::X9)), "MOV a0, s1");
        let br = AsmInst::Branch { cond: BranchCond::Geu, rs1: Reg::X10, rs2: Reg::X11 };
        assert_eq!(format!("{}", br), "BGEU a0, a1");
        assert_eq!(format!("{}", AsmInst::Undef), "UNIMP");
    }

    #[test]
    fn test_memory_operand_display() {
        assert_eq!(format!("{}", MemAddr::reg(Reg::SP, 16)), "16(sp)");
        let global = MemAddr { base: Some(Reg::GP), name: AddrName::Extern("counter".to_string()), offset: 8 };
        assert_eq!(format!("{}", global), "counter+8(gp)");
        let param = MemAddr::frame(AddrName::Param("x".to_string()), 0);
        assert_eq!(format!("{}", param), "x(FP)");
        let auto = MemAddr::frame(AddrName::Auto("tmp".to_string()), -16);
        assert_eq!(format!("{}", auto), "tmp-16(SP)");
        let load = AsmInst::Load { width: MemWidth::Word, rd: Reg::X5, addr: auto };
        assert_eq!(format!("{}", load), "LW t0, tmp-16(SP)");
    }
}
