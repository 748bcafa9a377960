use crate::flow::{StepId, SubStepId};
use thiserror::Error;

/// Errors that can occur when importing a serialized flow graph.
///
/// An import that fails with any of these leaves the current graph untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Failed to parse flow snapshot: {0}")]
    Parse(String),

    #[error("Unsupported snapshot version '{0}'")]
    UnsupportedVersion(String),

    #[error("Step id '{0}' appears more than once in the snapshot")]
    DuplicateStepId(StepId),

    #[error("Sub-step id '{sub_step_id}' appears more than once in step '{step_id}'")]
    DuplicateSubStepId {
        step_id: StepId,
        sub_step_id: SubStepId,
    },
}

/// Errors reported by a simulation when a decision cannot be applied.
///
/// These are caller errors: the simulation state is never modified when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("The simulation is already complete")]
    AlreadyComplete,

    #[error("The cursor does not resolve to a sub-step (step '{step_id}', index {sub_step_index})")]
    UnresolvedCursor {
        step_id: StepId,
        sub_step_index: usize,
    },

    #[error("The decision limit of {0} has been reached")]
    DecisionLimitReached(usize),

    #[error("Start step '{0}' does not exist in the flow")]
    UnknownStartStep(StepId),
}

/// Errors that can occur while encoding, decoding or storing a snapshot artifact.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Binary encoding failed: {0}")]
    Encode(String),

    #[error("Binary decoding failed: {0}")]
    Decode(String),

    #[error("Could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Import(#[from] ImportError),
}
