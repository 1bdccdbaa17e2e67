//! Liveness markers for frame variables
//!
//! VarDef, VarKill and VarLive values produce no machine code. Lowering hands
//! the variable to a [`LivenessSink`] together with the stream index the
//! marker sits at, and the stack-map builder downstream decides what to do
//! with it.

use rvssa_ir::FrameVar;

/// Receiver of frame variable liveness markers
pub trait LivenessSink {
    /// `var` starts a new lifetime at instruction index `at`
    fn var_def(&mut self, var: &FrameVar, at: usize);

    /// `var` is dead from `at` on
    fn var_kill(&mut self, var: &FrameVar, at: usize);

    /// `var` must be considered live at `at`
    fn var_live(&mut self, var: &FrameVar, at: usize);
}

/// A recorded liveness marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LivenessEvent {
    Def { var: FrameVar, at: usize },
    Kill { var: FrameVar, at: usize },
    Live { var: FrameVar, at: usize },
}

/// Sink that records every marker in order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LivenessLog {
    events: Vec<LivenessEvent>,
}

impl LivenessLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[LivenessEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<LivenessEvent> {
        self.events
    }
}

impl LivenessSink for LivenessLog {
    fn var_def(&mut self, var: &FrameVar, at: usize) {
        self.events.push(LivenessEvent::Def { var: var.clone(), at });
    }

    fn var_kill(&mut self, var: &FrameVar, at: usize) {
        self.events.push(LivenessEvent::Kill { var: var.clone(), at });
    }

    fn var_live(&mut self, var: &FrameVar, at: usize) {
        self.events.push(LivenessEvent::Live { var: var.clone(), at });
    }
}

/// Sink that drops every marker
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreLiveness;

impl LivenessSink for IgnoreLiveness {
    fn var_def(&mut self, _var: &FrameVar, _at: usize) {}
    fn var_kill(&mut self, _var: &FrameVar, _at: usize) {}
    fn var_live(&mut self, _var: &FrameVar, _at: usize) {}
}
