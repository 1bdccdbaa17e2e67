//! Assembly text emission
//!
//! Renders an instruction stream as text. Branch targets are printed
//! symbolically (`-> b3`); turning them into offsets is the patcher's job.

use crate::asm::AsmInst;
use crate::stream::{InstStream, PendingBranch};
use rvssa_common::BlockId;
use std::collections::HashMap;

/// Render one instruction per line
pub fn emit_instructions(stream: &InstStream) -> String {
    let mut out = String::new();
    for prog in stream.iter() {
        out.push_str(&format!("{}\n", prog.inst));
    }
    out
}

/// Render a function listing with block labels and symbolic branch targets.
///
/// `block_starts` holds, in layout order, each block and the index of its
/// first instruction. Blocks that emitted nothing share the index of the next
/// instruction and get their label printed in order.
pub fn render_listing(
    name: &str,
    stream: &InstStream,
    branches: &[PendingBranch],
    block_starts: &[(BlockId, usize)],
    with_lines: bool,
) -> String {
    let targets: HashMap<usize, BlockId> = branches.iter().map(|b| (b.inst, b.target)).collect();
    let mut labels = block_starts.iter().peekable();

    let mut out = String::new();
    out.push_str(&format!("{}:\n", name));

    for (index, prog) in stream.iter().enumerate() {
        while let Some((block, _)) = labels.next_if(|(_, start)| *start <= index) {
            out.push_str(&format!("b{}:\n", block));
        }

        let mut line = format!("    {}", prog.inst);
        if let Some(target) = targets.get(&index) {
            if matches!(prog.inst, AsmInst::Jmp) {
                line.push_str(&format!(" -> b{}", target));
            } else {
                line.push_str(&format!(", -> b{}", target));
            }
        }
        if with_lines && prog.pos.is_known() {
            line.push_str(&format!("    ; {}", prog.pos));
        }
        out.push_str(&line);
        out.push('\n');
    }

    for (block, _) in labels {
        out.push_str(&format!("b{}:\n", block));
    }

    out
}
