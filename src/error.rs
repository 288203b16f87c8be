//! Caller-visible error kinds for the coordinator.

use crate::plan::models::TaskId;
use crate::progress::models::TaskStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the coordinator core.
///
/// The core never swallows or translates these; recoverability is the
/// caller's concern (see the per-variant notes).
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The submitted plan could not be ingested. Caller corrects the input
    /// and retries.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// The task graph contains a cycle. The offending path is returned
    /// verbatim; the caller removes an edge and retries.
    #[error("circular dependency: {}", format_cycle(.0))]
    CircularDependency(Vec<TaskId>),

    /// The referenced plan is not registered with this coordinator.
    #[error("unknown plan {0}")]
    UnknownPlan(uuid::Uuid),

    /// The referenced task does not exist in the plan.
    #[error("unknown task {0}")]
    UnknownTask(TaskId),

    /// The referenced checkpoint does not exist in the execution plan.
    #[error("unknown checkpoint {0}")]
    UnknownCheckpoint(String),

    /// The requested status transition is not permitted by the task
    /// state machine. Caller is out of sync; re-query state.
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition { from: TaskStatus, to: TaskStatus },

    /// A completion percentage outside [0, 100] was supplied.
    #[error("completion percentage {0} out of range 0..=100")]
    InvalidCompletionPercentage(f64),

    /// Validation produced blocking issues. The operator decides how to
    /// proceed; the offending data is still available for inspection.
    #[error("validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// The referenced project is not registered with the result compiler.
    #[error("unknown project {0}")]
    UnknownProject(String),

    /// A long-running operation observed its cancellation signal. No
    /// partial filesystem state was committed.
    #[error("operation cancelled")]
    Cancelled,

    /// Filesystem failure during materialization. Transient; retry at the
    /// caller's discretion.
    #[error("i/o error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_cycle(cycle: &[TaskId]) -> String {
    cycle
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;
