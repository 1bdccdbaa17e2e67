//! JSON loading and structural validation of SSA functions
//!
//! Validation only checks referential integrity (every id points at
//! something). Semantic placement rules, such as where a control value must
//! be scheduled, are enforced by the lowering stage itself.

use crate::ssa::Func;
use rvssa_common::{BlockId, ValueId};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("value at arena index {index} has id v{id}")]
    ValueIdMismatch { index: usize, id: ValueId },

    #[error("duplicate block id b{0}")]
    DuplicateBlock(BlockId),

    #[error("{referrer} refers to unknown value v{id}")]
    UnknownValue { referrer: String, id: ValueId },

    #[error("{referrer} refers to unknown block b{id}")]
    UnknownBlock { referrer: String, id: BlockId },

    #[error("v{value} is scheduled in b{listed} but records b{owner} as its block")]
    Membership {
        value: ValueId,
        listed: BlockId,
        owner: BlockId,
    },

    #[error("v{0} is scheduled more than once")]
    ScheduledTwice(ValueId),
}

/// Parse a function from JSON and validate it
pub fn load_func_json(text: &str) -> Result<Func, IrError> {
    let func: Func = serde_json::from_str(text)?;
    validate(&func)?;
    Ok(func)
}

/// Serialize a function to pretty JSON
pub fn func_to_json(func: &Func) -> Result<String, IrError> {
    Ok(serde_json::to_string_pretty(func)?)
}

/// Check that every id in the function refers to something that exists
pub fn validate(func: &Func) -> Result<(), IrError> {
    for (index, value) in func.values.iter().enumerate() {
        if value.id as usize != index {
            return Err(IrError::ValueIdMismatch { index, id: value.id });
        }
        for arg in &value.args {
            if func.value(*arg).is_none() {
                return Err(IrError::UnknownValue {
                    referrer: format!("v{}", value.id),
                    id: *arg,
                });
            }
        }
    }

    let mut block_ids = HashSet::new();
    for block in &func.blocks {
        if !block_ids.insert(block.id) {
            return Err(IrError::DuplicateBlock(block.id));
        }
    }

    let mut scheduled = HashSet::new();
    for block in &func.blocks {
        for id in &block.values {
            let value = func.value(*id).ok_or_else(|| IrError::UnknownValue {
                referrer: format!("b{}", block.id),
                id: *id,
            })?;
            if value.block != block.id {
                return Err(IrError::Membership {
                    value: *id,
                    listed: block.id,
                    owner: value.block,
                });
            }
            if !scheduled.insert(*id) {
                return Err(IrError::ScheduledTwice(*id));
            }
        }
        if let Some(control) = block.control {
            if func.value(control).is_none() {
                return Err(IrError::UnknownValue {
                    referrer: format!("control of b{}", block.id),
                    id: control,
                });
            }
        }
        for succ in &block.succs {
            if !block_ids.contains(succ) {
                return Err(IrError::UnknownBlock {
                    referrer: format!("b{}", block.id),
                    id: *succ,
                });
            }
        }
    }

    for id in func.slots.keys() {
        if func.value(*id).is_none() {
            return Err(IrError::UnknownValue {
                referrer: "slot table".to_string(),
                id: *id,
            });
        }
    }

    Ok(())
}
