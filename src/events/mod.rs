//! Progress event system.
//!
//! This module provides:
//! - `ProgressEvent` — typed events emitted as tasks, phases, milestones
//!   and checkpoints change state
//! - `EventBus` — broadcast channel distributing events to subscribers

pub mod bus;
pub mod types;

pub use bus::EventBus;
pub use types::{EventKind, ProgressEvent};
