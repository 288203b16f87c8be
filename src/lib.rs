//! Project Coordinator
//!
//! The execution-coordination core for multi-agent development:
//! - Plan ingestion with dependency inference and skill scoring
//! - CPM scheduling (critical path, parallel phases, priorities)
//! - Agent assignment with workload balancing
//! - Live progress tracking, rollups, and risk analytics
//! - Result compilation of worker artifacts into a project tree

pub mod assign;
pub mod compiler;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod plan;
pub mod progress;
pub mod schedule;

pub use coordinator::{Coordinator, PlanId};
pub use error::{CoordinatorError, Result};

use serde::{Deserialize, Serialize};

/// Tunable knobs recognized by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Plans longer than this fail validation (days)
    pub max_project_duration_days: i64,
    /// A checkpoint is inserted after every N phases
    pub checkpoint_every_n_phases: usize,
    /// Workload balancing stops once max-min task counts fit this bound
    pub workload_imbalance_threshold: usize,
    /// Tasks within this many days of their phase end are flagged
    pub overdue_warning_days: i64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_project_duration_days: 90,
            checkpoint_every_n_phases: 3,
            workload_imbalance_threshold: 2,
            overdue_warning_days: 2,
        }
    }
}

impl CoordinatorConfig {
    /// Load configuration from environment variables, falling back to
    /// the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_project_duration_days: env_parse(
                "COORDINATOR_MAX_PROJECT_DURATION_DAYS",
                defaults.max_project_duration_days,
            ),
            checkpoint_every_n_phases: env_parse(
                "COORDINATOR_CHECKPOINT_EVERY_N_PHASES",
                defaults.checkpoint_every_n_phases,
            ),
            workload_imbalance_threshold: env_parse(
                "COORDINATOR_WORKLOAD_IMBALANCE_THRESHOLD",
                defaults.workload_imbalance_threshold,
            ),
            overdue_warning_days: env_parse(
                "COORDINATOR_OVERDUE_WARNING_DAYS",
                defaults.overdue_warning_days,
            ),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

/// Install a `tracing` subscriber honoring `RUST_LOG`.
///
/// Optional convenience for binaries and tests; calling it twice is a
/// no-op.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
