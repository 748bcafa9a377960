//! Step-by-step execution of a flow graph.
//!
//! A [`SimulationSession`] owns an immutable copy of the steps it was started with, a
//! cursor pointing at the current decision, and an append-only history of the outcomes
//! submitted so far. Each call to [`SimulationSession::submit_outcome`] resolves exactly
//! one decision and reports where the cursor went as a [`Transition`].

use crate::flow::{Outcome, StepId};
use serde::{Deserialize, Serialize};

mod builder;
mod engine;

pub use builder::SimulationBuilder;
pub use engine::SimulationSession;

/// The simulation's current position: a step and the index of a sub-step inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub step_id: StepId,
    pub sub_step_index: usize,
}

impl Cursor {
    pub fn at_start_of(step_id: StepId) -> Self {
        Self {
            step_id,
            sub_step_index: 0,
        }
    }
}

/// One visited position and the outcome recorded there.
///
/// Reaching a step without sub-steps also produces an entry, at index 0, carrying the
/// outcome that led into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub step_id: StepId,
    pub sub_step_index: usize,
    pub outcome: Outcome,
}

/// Where a submitted outcome moved the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to the next sub-step of the same step.
    Advanced(Cursor),
    /// A sub-step `goto` jumped to another step.
    Jumped(Cursor),
    /// The sub-steps were exhausted and the step-level link was followed.
    Linked(Cursor),
    /// Entered a step without sub-steps; the simulation is now complete.
    Terminal(StepId),
    /// No next step exists (missing or dangling link); the simulation is now complete.
    Completed,
}

impl Transition {
    /// Whether this transition ended the simulation.
    pub fn is_final(&self) -> bool {
        matches!(self, Transition::Terminal(_) | Transition::Completed)
    }
}
