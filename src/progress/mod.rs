//! Live progress tracking: task state machine, rollups, risk analytics.

pub mod analysis;
pub mod models;
pub mod tracker;

pub use models::{
    AtRiskTask, Bottleneck, CheckpointVerification, CompletionEvent, MilestoneProgress,
    ProgressRecord, ProgressReport, ProjectProgress, RiskLevel, TaskStatus, TimelineAnalysis,
};
pub use tracker::ProgressTracker;
