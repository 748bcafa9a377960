use super::SimulationSession;
use crate::error::SimulationError;
use crate::flow::{Step, StepId, StepIndex};

/// Configures a [`SimulationSession`] before it starts.
///
/// ```rust
/// use stepflow::prelude::*;
///
/// let mut flow = FlowGraphSession::new();
/// let a = flow.add_step("Check power", StepKind::Decision).unwrap();
/// flow.add_sub_step(a.as_str());
///
/// let simulation = flow.simulation().with_decision_limit(50).build().unwrap();
/// assert!(!simulation.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    steps: Vec<Step>,
    start: Option<StepId>,
    decision_limit: Option<usize>,
}

impl SimulationBuilder {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            start: None,
            decision_limit: None,
        }
    }

    /// Starts at `step_id` instead of the first step.
    pub fn start_at(mut self, step_id: impl Into<StepId>) -> Self {
        self.start = Some(step_id.into());
        self
    }

    /// Rejects further decisions once `limit` of them have been recorded.
    ///
    /// Cyclic flows never complete on their own; this bounds a scripted replay.
    pub fn with_decision_limit(mut self, limit: usize) -> Self {
        self.decision_limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<SimulationSession, SimulationError> {
        let steps = StepIndex::new(self.steps);
        let start = match self.start {
            Some(id) if steps.contains(id.as_str()) => Some(id),
            Some(id) => return Err(SimulationError::UnknownStartStep(id)),
            None => steps.first().map(|step| step.id.clone()),
        };
        Ok(SimulationSession::from_parts(
            steps,
            start,
            self.decision_limit,
        ))
    }
}
