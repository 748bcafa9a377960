pub mod index;
pub mod model;
pub mod patch;
pub mod session;
pub mod snapshot;

pub use index::StepIndex;
pub use model::*;
pub use patch::SubStepPatch;
pub use session::FlowGraphSession;
pub use snapshot::{FlowSnapshot, SNAPSHOT_VERSION};
