//! Common types used throughout the backend
//!
//! This module defines data types that are shared across the IR model and
//! the lowering passes, such as identifiers and the value type model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SSA value identifier (index into a function's value arena)
pub type ValueId = u32;

/// Basic block identifier
pub type BlockId = u32;

/// Abstract register index handed out by the register allocator (0..=31).
///
/// Construction is validated, so every `RegIndex` in a function maps onto a
/// physical register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RegIndex(u8);

impl RegIndex {
    /// Number of allocatable integer registers
    pub const COUNT: usize = 32;

    pub const GP: RegIndex = RegIndex(3);
    pub const T0: RegIndex = RegIndex(5);
    pub const T1: RegIndex = RegIndex(6);
    pub const T2: RegIndex = RegIndex(7);
    pub const S1: RegIndex = RegIndex(9);
    pub const A0: RegIndex = RegIndex(10);
    pub const A1: RegIndex = RegIndex(11);

    pub fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for RegIndex {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        RegIndex::new(index).ok_or_else(|| format!("register index {} out of range 0..{}", index, RegIndex::COUNT))
    }
}

impl From<RegIndex> for u8 {
    fn from(index: RegIndex) -> u8 {
        index.0
    }
}

impl fmt::Display for RegIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Result type of an SSA value.
///
/// Only the properties the lowering stage queries are modelled: byte size,
/// float-ness, and the memory/flags token markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// Integer of the given width in bytes
    Int { size: u64, signed: bool },
    /// Pointer (64-bit)
    Ptr,
    /// Boolean, stored in one byte
    Bool,
    /// Floating point of the given width in bytes
    Float { size: u64 },
    /// Memory token, no runtime representation
    Mem,
    /// Condition flags
    Flags,
    /// Aggregate of arbitrary size
    Aggregate { size: u64 },
    /// No value
    Void,
}

impl Type {
    pub const I8: Type = Type::Int { size: 1, signed: true };
    pub const I16: Type = Type::Int { size: 2, signed: true };
    pub const I32: Type = Type::Int { size: 4, signed: true };
    pub const I64: Type = Type::Int { size: 8, signed: true };
    pub const U8: Type = Type::Int { size: 1, signed: false };
    pub const U16: Type = Type::Int { size: 2, signed: false };
    pub const U32: Type = Type::Int { size: 4, signed: false };
    pub const U64: Type = Type::Int { size: 8, signed: false };
    pub const F32: Type = Type::Float { size: 4 };
    pub const F64: Type = Type::Float { size: 8 };

    /// Size of the type in bytes
    pub fn size(&self) -> u64 {
        match self {
            Type::Int { size, .. } | Type::Float { size } | Type::Aggregate { size } => *size,
            Type::Ptr => 8,
            Type::Bool => 1,
            Type::Mem | Type::Flags | Type::Void => 0,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float { .. })
    }

    /// Check if this is a memory token
    pub fn is_memory(&self) -> bool {
        matches!(self, Type::Mem)
    }

    /// Check if this is a flags value
    pub fn is_flags(&self) -> bool {
        matches!(self, Type::Flags)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int { size, signed: true } => write_sized(f, "int", *size),
            Type::Int { size, signed: false } => write_sized(f, "uint", *size),
            Type::Ptr => write!(f, "ptr"),
            Type::Bool => write!(f, "bool"),
            Type::Float { size } => write_sized(f, "float", *size),
            Type::Mem => write!(f, "mem"),
            Type::Flags => write!(f, "flags"),
            Type::Aggregate { size } => write!(f, "[{}]byte", size),
            Type::Void => write!(f, "void"),
        }
    }
}

/// `int64` style name; sizes too large to count in bits keep the byte count
fn write_sized(f: &mut fmt::Formatter<'_>, base: &str, size: u64) -> fmt::Result {
    match size.checked_mul(8) {
        Some(bits) => write!(f, "{}{}", base, bits),
        None => write!(f, "{}[{} bytes]", base, size),
    }
}
