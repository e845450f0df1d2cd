//! Lifecycle of an execution engine.
//!
//! The running bit may only change while the runtime is unlocked. `startup`
//! walks `LockedStopped -> UnlockedStopped -> UnlockedRunning -> LockedRunning`
//! and `shutdown` walks back down to `LockedStopped`.

use serde::Serialize;

use crate::error::{CpuError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RunState {
    #[default]
    LockedStopped,
    UnlockedStopped,
    UnlockedRunning,
    LockedRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unlock,
    Lock,
    Start,
    Stop,
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Unlock => "unlock",
            Transition::Lock => "lock",
            Transition::Start => "start",
            Transition::Stop => "stop",
        }
    }
}

impl RunState {
    pub fn apply(self, transition: Transition) -> Result<RunState> {
        use RunState::*;
        use Transition::*;

        match (self, transition) {
            (LockedStopped | UnlockedStopped, Unlock) => Ok(UnlockedStopped),
            (LockedRunning | UnlockedRunning, Unlock) => Ok(UnlockedRunning),
            (LockedStopped | UnlockedStopped, Lock) => Ok(LockedStopped),
            (LockedRunning | UnlockedRunning, Lock) => Ok(LockedRunning),
            (UnlockedStopped | UnlockedRunning, Start) => Ok(UnlockedRunning),
            (UnlockedStopped | UnlockedRunning, Stop) => Ok(UnlockedStopped),
            (state, transition) => Err(CpuError::InvalidState { state, transition }),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RunState::UnlockedRunning | RunState::LockedRunning)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, RunState::LockedStopped | RunState::LockedRunning)
    }
}
