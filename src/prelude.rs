//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the stepflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use stepflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/flow.json")?;
//!
//! let mut flow = FlowGraphSession::new();
//! flow.import_snapshot(&json)?;
//!
//! let mut simulation = flow.start_simulation();
//! simulation.replay([Outcome::Success, Outcome::Failure])?;
//! println!("{}", HistoryFormatter::format_cursor(&simulation));
//! # Ok(())
//! # }
//! ```

// Flow graph editing
pub use crate::flow::{
    FlowGraphSession, FlowSnapshot, Outcome, Step, StepId, StepKind, SubStep, SubStepAction,
    SubStepId, SubStepPatch,
};

// Simulation
pub use crate::simulation::{Cursor, HistoryEntry, SimulationBuilder, SimulationSession, Transition};

// Error types
pub use crate::error::{ImportError, SimulationError, SnapshotError};

// Trace formatting
pub use crate::trace::HistoryFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
