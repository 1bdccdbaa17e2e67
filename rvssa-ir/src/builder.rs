//! Builder for SSA functions
//!
//! Used by tests and by the driver's demo programs to put together
//! already-scheduled, already-allocated functions without writing JSON.

use crate::ssa::{Aux, Block, BlockKind, Func, Op, Slot, Value};
use rvssa_common::{BlockId, RegIndex, SourcePos, Type, ValueId};

/// Incrementally builds a [`Func`]. Blocks are laid out in creation order.
#[derive(Debug)]
pub struct FuncBuilder {
    func: Func,
}

/// Handle to a freshly added value for setting its optional fields
pub struct ValueBuilder<'a> {
    value: &'a mut Value,
}

impl<'a> ValueBuilder<'a> {
    /// Assign the allocator's register
    pub fn reg(self, reg: RegIndex) -> Self {
        self.value.reg = Some(reg);
        self
    }

    pub fn aux_int(self, aux_int: i64) -> Self {
        self.value.aux_int = aux_int;
        self
    }

    pub fn aux(self, aux: Aux) -> Self {
        self.value.aux = aux;
        self
    }

    pub fn line(self, line: u32) -> Self {
        self.value.pos = SourcePos::new(line);
        self
    }

    pub fn id(&self) -> ValueId {
        self.value.id
    }
}

impl FuncBuilder {
    pub fn new(name: &str) -> Self {
        Self { func: Func::new(name) }
    }

    /// Append a new block at the end of the layout
    pub fn block(&mut self, kind: BlockKind) -> BlockId {
        let id = self.func.blocks.len() as BlockId;
        self.func.blocks.push(Block::new(id, kind));
        id
    }

    /// Append a value to the end of `block`'s schedule
    pub fn value(&mut self, block: BlockId, op: Op, ty: Type, args: &[ValueId]) -> ValueBuilder<'_> {
        let id = self.func.values.len() as ValueId;
        if let Some(b) = self.block_mut(block) {
            b.values.push(id);
        }
        self.func.values.push(Value {
            id,
            op,
            ty,
            args: args.to_vec(),
            aux_int: 0,
            aux: Aux::None,
            reg: None,
            block,
            pos: SourcePos::unknown(),
        });
        let index = self.func.values.len() - 1;
        ValueBuilder { value: &mut self.func.values[index] }
    }

    /// Add an edge `from -> to`; the first edge added is successor 0
    pub fn edge(&mut self, from: BlockId, to: BlockId) -> &mut Self {
        if let Some(b) = self.block_mut(from) {
            b.succs.push(to);
        }
        self
    }

    pub fn control(&mut self, block: BlockId, value: ValueId) -> &mut Self {
        if let Some(b) = self.block_mut(block) {
            b.control = Some(value);
        }
        self
    }

    pub fn block_line(&mut self, block: BlockId, line: u32) -> &mut Self {
        if let Some(b) = self.block_mut(block) {
            b.pos = SourcePos::new(line);
        }
        self
    }

    /// Record the stack slot of a spilled value
    pub fn slot(&mut self, value: ValueId, slot: Slot) -> &mut Self {
        self.func.slots.insert(value, slot);
        self
    }

    pub fn build(self) -> Func {
        self.func
    }

    fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.func.blocks.iter_mut().find(|b| b.id == id)
    }
}
