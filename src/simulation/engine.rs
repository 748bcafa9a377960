use super::{Cursor, HistoryEntry, SimulationBuilder, Transition};
use crate::error::SimulationError;
use crate::flow::{Outcome, Step, StepId, StepIndex, SubStep};
use tracing::{debug, trace};

/// Where a decision sends the cursor, computed before any state is touched.
enum Move {
    Within(usize),
    Jump(StepId),
    Link(StepId),
    End,
}

/// A running simulation over a fixed snapshot of steps.
///
/// The snapshot is owned by the session: edits made to the originating
/// [`FlowGraphSession`](crate::flow::FlowGraphSession) after the simulation started are
/// never observed. Cycles in the graph are followed as-is; use
/// [`SimulationBuilder::with_decision_limit`] to bound a replay.
#[derive(Debug, Clone)]
pub struct SimulationSession {
    steps: StepIndex,
    start: Option<StepId>,
    decision_limit: Option<usize>,
    cursor: Option<Cursor>,
    history: Vec<HistoryEntry>,
    decisions: usize,
    complete: bool,
}

impl SimulationSession {
    /// Starts a simulation at the first step, without a decision limit.
    pub fn new(steps: Vec<Step>) -> Self {
        let steps = StepIndex::new(steps);
        let start = steps.first().map(|step| step.id.clone());
        Self::from_parts(steps, start, None)
    }

    pub fn builder(steps: Vec<Step>) -> SimulationBuilder {
        SimulationBuilder::new(steps)
    }

    pub(super) fn from_parts(
        steps: StepIndex,
        start: Option<StepId>,
        decision_limit: Option<usize>,
    ) -> Self {
        let mut session = Self {
            steps,
            start,
            decision_limit,
            cursor: None,
            history: Vec::new(),
            decisions: 0,
            complete: false,
        };
        session.reset();
        session
    }

    /// Returns to the initial state over the same snapshot.
    ///
    /// An empty snapshot starts complete with no cursor. A start step without sub-steps
    /// starts complete with the cursor resting on it: there is nothing to decide.
    pub fn reset(&mut self) {
        self.history.clear();
        self.decisions = 0;
        self.cursor = self.start.clone().map(Cursor::at_start_of);
        self.complete = match self.cursor.as_ref() {
            Some(cursor) => self
                .steps
                .get(cursor.step_id.as_str())
                .is_none_or(|step| step.sub_steps.is_empty()),
            None => true,
        };
    }

    /// Resolves the decision under the cursor with `outcome`.
    ///
    /// Returns an error, and changes nothing, if the simulation is complete, the decision
    /// limit is reached, or the cursor does not point at an existing sub-step.
    pub fn submit_outcome(&mut self, outcome: Outcome) -> Result<Transition, SimulationError> {
        if self.complete {
            return Err(SimulationError::AlreadyComplete);
        }
        if let Some(limit) = self.decision_limit {
            if self.decisions >= limit {
                return Err(SimulationError::DecisionLimitReached(limit));
            }
        }
        let Some(cursor) = self.cursor.clone() else {
            return Err(SimulationError::AlreadyComplete);
        };

        let (step, sub_step) = self.resolve(&cursor)?;
        let next = Self::plan_move(step, sub_step, cursor.sub_step_index, outcome);

        trace!(step = %cursor.step_id, index = cursor.sub_step_index, %outcome, "Decision");
        self.history.push(HistoryEntry {
            step_id: cursor.step_id.clone(),
            sub_step_index: cursor.sub_step_index,
            outcome,
        });
        self.decisions += 1;

        let transition = match next {
            Move::Within(index) => {
                let cursor = Cursor {
                    step_id: cursor.step_id,
                    sub_step_index: index,
                };
                self.cursor = Some(cursor.clone());
                Transition::Advanced(cursor)
            }
            Move::Jump(target) => self.enter(target, outcome, Transition::Jumped),
            Move::Link(target) => self.enter(target, outcome, Transition::Linked),
            Move::End => self.finish(),
        };
        debug!(?transition, "Simulation advanced");
        Ok(transition)
    }

    /// Submits `outcomes` in order, stopping early once the simulation completes.
    ///
    /// Returns how many outcomes were accepted.
    pub fn replay<I>(&mut self, outcomes: I) -> Result<usize, SimulationError>
    where
        I: IntoIterator<Item = Outcome>,
    {
        let mut accepted = 0;
        for outcome in outcomes {
            if self.complete {
                break;
            }
            self.submit_outcome(outcome)?;
            accepted += 1;
        }
        Ok(accepted)
    }

    /// Takes back the last decision. Returns `false` if there was nothing to undo.
    ///
    /// The session is reset and the remaining decisions are replayed, which reproduces the
    /// earlier state exactly since traversal is deterministic.
    pub fn undo(&mut self) -> bool {
        let mut outcomes: Vec<Outcome> = self
            .history
            .iter()
            .filter(|entry| self.is_decision(entry))
            .map(|entry| entry.outcome)
            .collect();
        if outcomes.pop().is_none() {
            return false;
        }
        self.reset();
        let replayed = self.replay(outcomes).unwrap_or_default();
        debug!(replayed, "Undid last decision");
        true
    }

    // --- Queries ---

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn current_step(&self) -> Option<&Step> {
        let cursor = self.cursor.as_ref()?;
        self.steps.get(cursor.step_id.as_str())
    }

    pub fn current_sub_step(&self) -> Option<&SubStep> {
        let cursor = self.cursor.as_ref()?;
        self.current_step()?.sub_steps.get(cursor.sub_step_index)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn steps(&self) -> &[Step] {
        self.steps.steps()
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.get(step_id)
    }

    pub fn decision_limit(&self) -> Option<usize> {
        self.decision_limit
    }

    /// Number of history entries that resolved a sub-step (terminal records excluded).
    pub fn decision_count(&self) -> usize {
        self.decisions
    }

    /// Whether `entry` resolved a sub-step, as opposed to recording arrival at a step
    /// without sub-steps.
    pub fn is_decision(&self, entry: &HistoryEntry) -> bool {
        self.steps
            .get(entry.step_id.as_str())
            .is_some_and(|step| entry.sub_step_index < step.sub_steps.len())
    }

    // --- Traversal ---

    fn resolve(&self, cursor: &Cursor) -> Result<(&Step, &SubStep), SimulationError> {
        let unresolved = || SimulationError::UnresolvedCursor {
            step_id: cursor.step_id.clone(),
            sub_step_index: cursor.sub_step_index,
        };
        let step = self
            .steps
            .get(cursor.step_id.as_str())
            .ok_or_else(unresolved)?;
        let sub_step = step
            .sub_steps
            .get(cursor.sub_step_index)
            .ok_or_else(unresolved)?;
        Ok((step, sub_step))
    }

    /// A `goto` with a target wins over the remaining sub-steps. A `goto` without a target
    /// behaves like `next`. After the last sub-step only the step-level link can continue.
    fn plan_move(step: &Step, sub_step: &SubStep, index: usize, outcome: Outcome) -> Move {
        if let Some(target) = sub_step.goto_target(outcome) {
            return Move::Jump(target.clone());
        }
        if index + 1 < step.sub_steps.len() {
            return Move::Within(index + 1);
        }
        match step.link_for(outcome) {
            Some(target) => Move::Link(target.clone()),
            None => Move::End,
        }
    }

    fn enter(
        &mut self,
        target: StepId,
        outcome: Outcome,
        moved: fn(Cursor) -> Transition,
    ) -> Transition {
        let Some(step) = self.steps.get(target.as_str()) else {
            debug!(target = %target, "Link points at a missing step");
            return self.finish();
        };

        if step.sub_steps.is_empty() {
            self.history.push(HistoryEntry {
                step_id: target.clone(),
                sub_step_index: 0,
                outcome,
            });
            self.cursor = Some(Cursor::at_start_of(target.clone()));
            self.complete = true;
            return Transition::Terminal(target);
        }

        let cursor = Cursor::at_start_of(target);
        self.cursor = Some(cursor.clone());
        moved(cursor)
    }

    fn finish(&mut self) -> Transition {
        self.cursor = None;
        self.complete = true;
        Transition::Completed
    }
}
