//! CPM scheduling: earliest/latest times, critical path, parallel phases.

pub mod cpm;
pub mod models;

pub use cpm::build_schedule;
pub use models::{Checkpoint, PhaseGroup, PhaseWindow, Priority, Schedule, TaskNode, Timeline};
