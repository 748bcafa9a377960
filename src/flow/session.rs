use super::index::StepIndex;
use super::model::{Step, StepId, StepKind, SubStep, SubStepId};
use super::patch::SubStepPatch;
use super::snapshot::FlowSnapshot;
use crate::error::ImportError;
use crate::simulation::{SimulationBuilder, SimulationSession};
use tracing::{debug, warn};

/// The authoritative, editable collection of steps for one editing session.
///
/// Every operation is total: edits that reference an unknown id, or that carry invalid
/// input such as a blank title, leave the graph unchanged and report it through their
/// return value (`None` / `false`). Only imports return a descriptive error.
///
/// Deleting a step never repairs links on other steps that pointed at it; those links
/// simply resolve to "no next step" when a simulation reaches them.
#[derive(Debug, Clone, Default)]
pub struct FlowGraphSession {
    index: StepIndex,
    next_step_seq: u64,
    next_sub_step_seq: u64,
}

impl FlowGraphSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session holding the steps of `snapshot`.
    pub fn from_snapshot(snapshot: FlowSnapshot) -> Result<Self, ImportError> {
        let mut session = Self::new();
        session.import_from(snapshot)?;
        Ok(session)
    }

    // --- Queries ---

    pub fn steps(&self) -> &[Step] {
        self.index.steps()
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.index.get(step_id)
    }

    pub fn sub_step(&self, step_id: &str, sub_step_id: &str) -> Option<&SubStep> {
        self.index.get(step_id)?.sub_step(sub_step_id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // --- Steps ---

    /// Appends a new step with no sub-steps. Returns `None` if `title` is blank.
    pub fn add_step(&mut self, title: &str, kind: StepKind) -> Option<StepId> {
        if title.trim().is_empty() {
            debug!("Rejected step with a blank title");
            return None;
        }
        let id = self.fresh_step_id();
        self.index.push(Step::new(id.clone(), title, kind));
        debug!(step = %id, ?kind, "Added step");
        Some(id)
    }

    /// Changes a step's title, with the same blank-title rule as [`Self::add_step`].
    pub fn rename_step(&mut self, step_id: &str, title: &str) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        match self.index.get_mut(step_id) {
            Some(step) => {
                step.title = title.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_step_kind(&mut self, step_id: &str, kind: StepKind) -> bool {
        match self.index.get_mut(step_id) {
            Some(step) => {
                step.kind = kind;
                true
            }
            None => false,
        }
    }

    pub fn set_expanded(&mut self, step_id: &str, expanded: bool) -> bool {
        match self.index.get_mut(step_id) {
            Some(step) => {
                step.expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Flips the presentation flag. Returns the new value, or `None` for an unknown step.
    pub fn toggle_expanded(&mut self, step_id: &str) -> Option<bool> {
        let step = self.index.get_mut(step_id)?;
        step.expanded = !step.expanded;
        Some(step.expanded)
    }

    /// Removes a step. Links on other steps that point at it are left dangling.
    pub fn delete_step(&mut self, step_id: &str) -> bool {
        let removed = self.index.remove(step_id).is_some();
        if removed {
            debug!(step = step_id, "Deleted step");
        }
        removed
    }

    /// Moves a step to position `index` in the step list (clamped to the end).
    pub fn move_step(&mut self, step_id: &str, index: usize) -> bool {
        self.index.move_to(step_id, index)
    }

    /// Removes every step. Id counters keep running so old ids are not reissued.
    pub fn clear(&mut self) {
        self.index = StepIndex::default();
    }

    // --- Sub-steps ---

    /// Appends an empty sub-step (`next` on both outcomes) to the named step.
    pub fn add_sub_step(&mut self, step_id: &str) -> Option<SubStepId> {
        let seq = &mut self.next_sub_step_seq;
        let step = self.index.get_mut(step_id)?;
        let id = loop {
            *seq += 1;
            let candidate = format!("sub-{}", seq);
            if step.sub_step(&candidate).is_none() {
                break SubStepId::from(candidate);
            }
        };
        step.sub_steps.push(SubStep::new(id.clone()));
        debug!(step = step_id, sub_step = %id, "Added sub-step");
        Some(id)
    }

    pub fn update_sub_step_content(
        &mut self,
        step_id: &str,
        sub_step_id: &str,
        content: &str,
    ) -> bool {
        match self.sub_step_mut(step_id, sub_step_id) {
            Some(sub_step) => {
                sub_step.content = content.to_string();
                true
            }
            None => false,
        }
    }

    /// Merges the fields set in `patch` into the sub-step's routing configuration.
    pub fn update_sub_step_config(
        &mut self,
        step_id: &str,
        sub_step_id: &str,
        patch: SubStepPatch,
    ) -> bool {
        match self.sub_step_mut(step_id, sub_step_id) {
            Some(sub_step) => {
                debug!(step = step_id, sub_step = sub_step_id, ?patch, "Updated sub-step");
                patch.apply(sub_step);
                true
            }
            None => false,
        }
    }

    pub fn delete_sub_step(&mut self, step_id: &str, sub_step_id: &str) -> bool {
        let Some(step) = self.index.get_mut(step_id) else {
            return false;
        };
        match step.sub_step_position(sub_step_id) {
            Some(pos) => {
                step.sub_steps.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Moves a sub-step within its step to `index` (clamped to the end).
    pub fn move_sub_step(&mut self, step_id: &str, sub_step_id: &str, index: usize) -> bool {
        let Some(step) = self.index.get_mut(step_id) else {
            return false;
        };
        let Some(from) = step.sub_step_position(sub_step_id) else {
            return false;
        };
        let to = index.min(step.sub_steps.len() - 1);
        let sub_step = step.sub_steps.remove(from);
        step.sub_steps.insert(to, sub_step);
        true
    }

    // --- Links ---

    /// Sets the step-level success link. The target is not checked; self-loops are allowed.
    /// An empty `target_id` clears the link.
    pub fn connect_success(&mut self, source_id: &str, target_id: &str) -> bool {
        self.set_link(source_id, link_target(target_id), true)
    }

    /// Sets the step-level failure link. The target is not checked; self-loops are allowed.
    /// An empty `target_id` clears the link.
    pub fn connect_failure(&mut self, source_id: &str, target_id: &str) -> bool {
        self.set_link(source_id, link_target(target_id), false)
    }

    pub fn disconnect_success(&mut self, source_id: &str) -> bool {
        self.set_link(source_id, None, true)
    }

    pub fn disconnect_failure(&mut self, source_id: &str) -> bool {
        self.set_link(source_id, None, false)
    }

    fn set_link(&mut self, source_id: &str, target: Option<StepId>, success: bool) -> bool {
        let Some(step) = self.index.get_mut(source_id) else {
            return false;
        };
        debug!(source = source_id, ?target, success, "Updated step link");
        if success {
            step.success_step_id = target;
        } else {
            step.failure_step_id = target;
        }
        true
    }

    // --- Snapshots ---

    /// Deep, order-preserving copy of the current graph.
    pub fn export_snapshot(&self) -> FlowSnapshot {
        FlowSnapshot::new(self.index.steps().to_vec())
    }

    /// Replaces the whole graph with the one in `json`.
    ///
    /// On error the current graph is left exactly as it was.
    pub fn import_snapshot(&mut self, json: &str) -> Result<(), ImportError> {
        let snapshot = FlowSnapshot::from_json(json).inspect_err(|e| {
            warn!(error = %e, "Rejected flow import");
        })?;
        self.replace(snapshot);
        Ok(())
    }

    /// Replaces the whole graph with an already-parsed snapshot, validating it first.
    pub fn import_from(&mut self, snapshot: FlowSnapshot) -> Result<(), ImportError> {
        snapshot.validate().inspect_err(|e| {
            warn!(error = %e, "Rejected flow import");
        })?;
        self.replace(snapshot);
        Ok(())
    }

    fn replace(&mut self, snapshot: FlowSnapshot) {
        debug!(steps = snapshot.steps.len(), version = %snapshot.version, "Imported flow");
        self.skip_imported_ids(&snapshot.steps);
        self.index = StepIndex::new(snapshot.steps);
    }

    /// Moves both id counters past every generated-looking id in `steps`, including link
    /// targets. A later delete then never frees an id that another step still points at.
    fn skip_imported_ids(&mut self, steps: &[Step]) {
        for step in steps {
            let targets = [&step.success_step_id, &step.failure_step_id]
                .into_iter()
                .chain(
                    step.sub_steps
                        .iter()
                        .flat_map(|s| [&s.success_step_id, &s.failure_step_id]),
                )
                .flatten();
            for id in std::iter::once(&step.id).chain(targets) {
                if let Some(seq) = id_seq(id.as_str(), "step-") {
                    self.next_step_seq = self.next_step_seq.max(seq);
                }
            }
            for sub_step in &step.sub_steps {
                if let Some(seq) = id_seq(sub_step.id.as_str(), "sub-") {
                    self.next_sub_step_seq = self.next_sub_step_seq.max(seq);
                }
            }
        }
    }

    // --- Simulation ---

    /// Starts a simulation over a copy of the current steps.
    ///
    /// Later edits to this session are not visible to the returned simulation.
    pub fn start_simulation(&self) -> SimulationSession {
        SimulationSession::new(self.index.steps().to_vec())
    }

    /// Like [`Self::start_simulation`], but returns a builder for configuring the run.
    pub fn simulation(&self) -> SimulationBuilder {
        SimulationBuilder::new(self.index.steps().to_vec())
    }

    // --- Helpers ---

    fn sub_step_mut(&mut self, step_id: &str, sub_step_id: &str) -> Option<&mut SubStep> {
        self.index.get_mut(step_id)?.sub_step_mut(sub_step_id)
    }

    fn fresh_step_id(&mut self) -> StepId {
        loop {
            self.next_step_seq += 1;
            let candidate = format!("step-{}", self.next_step_seq);
            if !self.index.contains(&candidate) {
                return StepId::from(candidate);
            }
        }
    }
}

fn link_target(target_id: &str) -> Option<StepId> {
    (!target_id.is_empty()).then(|| StepId::from(target_id))
}

/// The counter value of an id shaped like `<prefix><N>`.
fn id_seq(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.parse().ok()
}
