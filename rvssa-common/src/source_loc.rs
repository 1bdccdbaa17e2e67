//! Source position tracking for emitted instructions
//!
//! Values and blocks carry the source line they were produced for. The
//! lowering stage tags every emitted instruction with the current position so
//! a line table can be built downstream.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A source line (1-based; 0 means unknown)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourcePos(pub u32);

impl SourcePos {
    pub fn new(line: u32) -> Self {
        Self(line)
    }

    /// Position used when the producer did not record one
    pub fn unknown() -> Self {
        Self(0)
    }

    pub fn line(&self) -> u32 {
        self.0
    }

    pub fn is_known(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "line {}", self.0)
        } else {
            write!(f, "line ?")
        }
    }
}
