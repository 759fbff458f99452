//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! lister's workflows.
//!
//! Use cases:
//! - `poster`: Create one listing and record it
//! - `purge`: Delete expired listings with bounded retry
//! - `runner`: The endless purge → post → persist → sleep loop

pub mod poster;
pub mod purge;
pub mod runner;

pub use poster::post_listing;
pub use purge::{PurgePolicy, PurgeReport, PurgeSweep};
pub use runner::{IterationReport, Runner, RunnerSettings};
