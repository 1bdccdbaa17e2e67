//! Per-function instruction stream and pending branch records
//!
//! Instructions are appended and never moved, so an index into the stream is
//! a stable handle. Branches record such a handle plus the target block; the
//! patching pass resolves them after the whole function is laid out.

use crate::asm::{AsmInst, Prog};
use rvssa_common::{BlockId, SourcePos};

/// A branch whose target offset is not known yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingBranch {
    /// Index of the branch instruction in the stream
    pub inst: usize,
    /// Block the branch jumps to
    pub target: BlockId,
}

/// Append-only sequence of emitted instructions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstStream {
    progs: Vec<Prog>,
}

impl InstStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction and return its index
    pub fn push(&mut self, inst: AsmInst, pos: SourcePos) -> usize {
        self.progs.push(Prog { inst, pos });
        self.progs.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Prog> {
        self.progs.get(index)
    }

    pub fn len(&self) -> usize {
        self.progs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.progs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prog> {
        self.progs.iter()
    }

    /// Instructions without positions, mostly for comparisons in tests
    pub fn insts(&self) -> Vec<AsmInst> {
        self.progs.iter().map(|p| p.inst.clone()).collect()
    }
}
