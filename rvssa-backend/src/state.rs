//! Per-function code generation state
//!
//! [`GenState`] owns everything lowering produces for one function: the
//! instruction stream, the pending branch list, block start indices and the
//! recorded gaps. Nothing in here is shared between functions.

use crate::liveness::LivenessSink;
use crate::LoweringOptions;
use log::{trace, warn};
use rvssa_codegen::{render_listing, AsmInst, InstStream, PendingBranch};
use rvssa_common::{BlockId, Gap, LoweringError, SourcePos};
use rvssa_ir::Func;

pub struct GenState<'a> {
    pub(crate) func: &'a Func,
    pub(crate) options: &'a LoweringOptions,
    pub(crate) sink: &'a mut dyn LivenessSink,
    stream: InstStream,
    branches: Vec<PendingBranch>,
    block_starts: Vec<(BlockId, usize)>,
    gaps: Vec<Gap>,
    pos: SourcePos,
}

impl<'a> GenState<'a> {
    pub fn new(func: &'a Func, options: &'a LoweringOptions, sink: &'a mut dyn LivenessSink) -> Self {
        Self {
            func,
            options,
            sink,
            stream: InstStream::new(),
            branches: Vec::new(),
            block_starts: Vec::new(),
            gaps: Vec::new(),
            pos: SourcePos::unknown(),
        }
    }

    /// Set the source position attached to subsequently emitted instructions
    pub fn set_pos(&mut self, pos: SourcePos) {
        self.pos = pos;
    }

    /// Append an instruction and return its index in the stream
    pub fn emit(&mut self, inst: AsmInst) -> usize {
        trace!("  emit [{}] {}", self.stream.len(), inst);
        self.stream.push(inst, self.pos)
    }

    /// Append a branch or jump and record it as pending on `target`
    pub fn emit_branch(&mut self, inst: AsmInst, target: BlockId) -> usize {
        let index = self.emit(inst);
        trace!("  pending [{}] -> b{}", index, target);
        self.branches.push(PendingBranch { inst: index, target });
        index
    }

    /// Mark the start of a block at the current end of the stream
    pub fn start_block(&mut self, block: BlockId) {
        self.block_starts.push((block, self.stream.len()));
    }

    /// Record an unimplemented lowering.
    ///
    /// Fatal when the options ask for complete output.
    pub fn gap(&mut self, gap: Gap) -> Result<(), LoweringError> {
        warn!("{}: {}", self.func.name, gap);
        if self.options.fail_on_gap {
            return Err(gap.into());
        }
        self.gaps.push(gap);
        Ok(())
    }

    pub fn stream(&self) -> &InstStream {
        &self.stream
    }

    pub fn branches(&self) -> &[PendingBranch] {
        &self.branches
    }

    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    pub fn finish(self) -> FuncOutput {
        FuncOutput {
            name: self.func.name.clone(),
            stream: self.stream,
            branches: self.branches,
            block_starts: self.block_starts,
            gaps: self.gaps,
        }
    }
}

/// Everything lowering produced for one function, ready for the patcher
#[derive(Debug, Clone, PartialEq)]
pub struct FuncOutput {
    pub name: String,
    pub stream: InstStream,
    /// Pending branches in emission order
    pub branches: Vec<PendingBranch>,
    /// Each block in layout order with the index of its first instruction
    pub block_starts: Vec<(BlockId, usize)>,
    pub gaps: Vec<Gap>,
}

impl FuncOutput {
    /// True if no lowering was skipped
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Text listing with block labels and symbolic branch targets
    pub fn listing(&self, with_lines: bool) -> String {
        render_listing(&self.name, &self.stream, &self.branches, &self.block_starts, with_lines)
    }
}
