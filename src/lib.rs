//! # Stepflow - Flow Graph Model and Step-by-Step Simulator
//!
//! **Stepflow** models flow diagrams made of steps and ordered sub-steps connected by
//! success/failure branches, and walks them one decision at a time. It is the core behind
//! a visual flow builder: editors mutate the graph, renderers read the simulation cursor
//! and history, and everything in between is a synchronous method call.
//!
//! ## Core Workflow
//!
//! 1.  **Build a Flow**: Use a [`FlowGraphSession`](flow::FlowGraphSession) to add steps,
//!     append sub-steps, configure their `next`/`goto` routing and connect step-level
//!     success/failure links. Or import a JSON snapshot produced by an editor.
//! 2.  **Start a Simulation**: `start_simulation()` hands an owned copy of the steps to a
//!     [`SimulationSession`](simulation::SimulationSession). Later edits do not leak into it.
//! 3.  **Submit Outcomes**: Each `submit_outcome(Outcome::Success | Outcome::Failure)`
//!     resolves the decision under the cursor, appends it to the history and reports the
//!     resulting [`Transition`](simulation::Transition).
//! 4.  **Render**: Read the cursor and history, or format them with
//!     [`HistoryFormatter`](trace::HistoryFormatter).
//!
//! ## Quick Start
//!
//! ```rust
//! use stepflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut flow = FlowGraphSession::new();
//!     let check = flow.add_step("Check cable", StepKind::Decision).unwrap();
//!     let fixed = flow.add_step("Fixed", StepKind::Success).unwrap();
//!     let escalate = flow.add_step("Escalate", StepKind::Failure).unwrap();
//!
//!     let prompt = flow.add_sub_step(check.as_str()).unwrap();
//!     flow.update_sub_step_content(check.as_str(), prompt.as_str(), "Is the cable plugged in?");
//!     flow.connect_success(check.as_str(), fixed.as_str());
//!     flow.connect_failure(check.as_str(), escalate.as_str());
//!
//!     let mut simulation = flow.start_simulation();
//!     let transition = simulation.submit_outcome(Outcome::Failure)?;
//!
//!     assert_eq!(transition, Transition::Terminal(escalate));
//!     assert!(simulation.is_complete());
//!     println!("{}", HistoryFormatter::format_history(&simulation));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod flow;
pub mod prelude;
pub mod simulation;
pub mod trace;
