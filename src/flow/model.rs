use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque, graph-unique identifier of a [`Step`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

/// Identifier of a [`SubStep`], unique within its parent step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubStepId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(StepId);
string_id!(SubStepId);

/// Classification of a step. Purely descriptive: traversal ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    #[default]
    Normal,
    Success,
    Failure,
    Decision,
}

/// What a sub-step does when a given outcome is submitted on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubStepAction {
    /// Continue with the next sub-step, or leave through the step-level link after the last one.
    #[default]
    Next,
    /// Jump to the target declared on the sub-step itself.
    Goto,
}

/// The binary result submitted at each decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.write_str("success"),
            Outcome::Failure => f.write_str("failure"),
        }
    }
}

/// An ordered decision point inside a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubStep {
    pub id: SubStepId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub success_action: SubStepAction,
    #[serde(default)]
    pub failure_action: SubStepAction,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub success_step_id: Option<StepId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub failure_step_id: Option<StepId>,
}

impl SubStep {
    /// Creates an empty sub-step that continues on both outcomes.
    pub fn new(id: SubStepId) -> Self {
        Self {
            id,
            content: String::new(),
            success_action: SubStepAction::Next,
            failure_action: SubStepAction::Next,
            success_step_id: None,
            failure_step_id: None,
        }
    }

    pub fn action_for(&self, outcome: Outcome) -> SubStepAction {
        match outcome {
            Outcome::Success => self.success_action,
            Outcome::Failure => self.failure_action,
        }
    }

    pub fn target_for(&self, outcome: Outcome) -> Option<&StepId> {
        match outcome {
            Outcome::Success => self.success_step_id.as_ref(),
            Outcome::Failure => self.failure_step_id.as_ref(),
        }
    }

    /// The step this sub-step jumps to for `outcome`, if its action is a `goto` with a target.
    pub fn goto_target(&self, outcome: Outcome) -> Option<&StepId> {
        match self.action_for(outcome) {
            SubStepAction::Goto => self.target_for(outcome),
            SubStepAction::Next => None,
        }
    }
}

/// A node of the flow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: StepId,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: StepKind,
    #[serde(default)]
    pub sub_steps: Vec<SubStep>,
    /// Presentation-only flag. Carried through snapshots, ignored by the engine.
    #[serde(default)]
    pub expanded: bool,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub success_step_id: Option<StepId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub failure_step_id: Option<StepId>,
}

impl Step {
    pub fn new(id: StepId, title: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            sub_steps: Vec::new(),
            expanded: false,
            success_step_id: None,
            failure_step_id: None,
        }
    }

    /// The step-level link followed when the sub-steps are exhausted with `outcome`.
    pub fn link_for(&self, outcome: Outcome) -> Option<&StepId> {
        match outcome {
            Outcome::Success => self.success_step_id.as_ref(),
            Outcome::Failure => self.failure_step_id.as_ref(),
        }
    }

    pub fn sub_step(&self, id: &str) -> Option<&SubStep> {
        self.sub_steps.iter().find(|s| s.id.as_str() == id)
    }

    pub fn sub_step_mut(&mut self, id: &str) -> Option<&mut SubStep> {
        self.sub_steps.iter_mut().find(|s| s.id.as_str() == id)
    }

    pub fn sub_step_position(&self, id: &str) -> Option<usize> {
        self.sub_steps.iter().position(|s| s.id.as_str() == id)
    }
}

/// Editors that bind targets to a `<select>` tend to emit `""` for "no target".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<StepId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|id| !id.is_empty()).map(StepId))
}
