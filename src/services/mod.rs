//! Core services of the comparison engine.
//!
//! The algorithm modules (`date`, `grouping`, `planner`, `diff`, `signals`,
//! `classify`) are pure functions over in-memory text. `comparison` wires
//! them into a run.

pub mod classify;
pub mod comparison;
pub mod date;
pub mod diff;
pub mod grouping;
pub mod planner;
pub mod signals;

pub use classify::Classifier;
pub use comparison::{ComparisonRun, ComparisonService};
