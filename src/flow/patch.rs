use super::model::{StepId, SubStep, SubStepAction};

/// A field-by-field update for a sub-step's routing configuration.
///
/// Every field is optional; `None` leaves the corresponding field of the target untouched.
/// Targets use a nested option so that a patch can explicitly clear a target
/// (`Some(None)`) instead of leaving it as is.
///
/// # Example
///
/// ```rust
/// use stepflow::flow::{SubStepAction, SubStepPatch};
///
/// let patch = SubStepPatch::new()
///     .success_action(SubStepAction::Goto)
///     .success_target("step-3");
/// assert!(!patch.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubStepPatch {
    pub success_action: Option<SubStepAction>,
    pub failure_action: Option<SubStepAction>,
    pub success_step_id: Option<Option<StepId>>,
    pub failure_step_id: Option<Option<StepId>>,
}

impl SubStepPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_action(mut self, action: SubStepAction) -> Self {
        self.success_action = Some(action);
        self
    }

    pub fn failure_action(mut self, action: SubStepAction) -> Self {
        self.failure_action = Some(action);
        self
    }

    pub fn success_target(mut self, target: impl Into<StepId>) -> Self {
        self.success_step_id = Some(Some(target.into()));
        self
    }

    pub fn failure_target(mut self, target: impl Into<StepId>) -> Self {
        self.failure_step_id = Some(Some(target.into()));
        self
    }

    pub fn clear_success_target(mut self) -> Self {
        self.success_step_id = Some(None);
        self
    }

    pub fn clear_failure_target(mut self) -> Self {
        self.failure_step_id = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.success_action.is_none()
            && self.failure_action.is_none()
            && self.success_step_id.is_none()
            && self.failure_step_id.is_none()
    }

    /// Merges the set fields into `sub_step`.
    pub(crate) fn apply(self, sub_step: &mut SubStep) {
        if let Some(action) = self.success_action {
            sub_step.success_action = action;
        }
        if let Some(action) = self.failure_action {
            sub_step.failure_action = action;
        }
        if let Some(target) = self.success_step_id {
            // An empty id means "no target", same as on import.
            sub_step.success_step_id = target.filter(|id| !id.as_str().is_empty());
        }
        if let Some(target) = self.failure_step_id {
            sub_step.failure_step_id = target.filter(|id| !id.as_str().is_empty());
        }
    }
}
