//! Progress state: the task status machine, records, rollups, and risk
//! classification types.

use crate::error::{CoordinatorError, Result};
use crate::plan::models::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
    Failed,
    Cancelled,
}

impl TaskStatus {
    /// Terminal states can only be left through the explicit reopen
    /// operation (and then only from COMPLETED).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }

    /// Whether the state machine permits `self -> to`.
    ///
    /// Same-state updates are allowed for non-terminal states so
    /// completion percentages can be refreshed without a transition.
    pub fn can_transition(&self, to: TaskStatus) -> bool {
        use TaskStatus::*;
        match (*self, to) {
            (Pending, InProgress | Blocked | Cancelled) => true,
            (InProgress, Completed | Blocked | Failed | Cancelled) => true,
            (Blocked, InProgress | Cancelled | Failed) => true,
            (from, to) if from == to && !from.is_terminal() => true,
            _ => false,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One entry in a task's append-only update history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub timestamp: DateTime<Utc>,
    pub status: TaskStatus,
    pub completion_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Mutable progress state of a single task. One record per task, owned
/// by the progress tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub status: TaskStatus,
    pub completion_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_update_timestamp: Option<DateTime<Utc>>,
    pub updates: Vec<ProgressUpdate>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRecord {
    /// A fresh PENDING record.
    pub fn new() -> Self {
        Self {
            status: TaskStatus::Pending,
            completion_percentage: 0.0,
            start_timestamp: None,
            completion_timestamp: None,
            latest_update_timestamp: None,
            updates: Vec::new(),
        }
    }

    /// Apply a status update.
    ///
    /// Entering IN_PROGRESS for the first time stamps `start_timestamp`;
    /// COMPLETED stamps `completion_timestamp` and forces the completion
    /// percentage to 100. Update timestamps are clamped so the history
    /// stays monotonically non-decreasing.
    pub fn apply(
        &mut self,
        new_status: TaskStatus,
        completion_percentage: Option<f64>,
        notes: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(pct) = completion_percentage {
            if !(0.0..=100.0).contains(&pct) {
                return Err(CoordinatorError::InvalidCompletionPercentage(pct));
            }
        }
        if !self.status.can_transition(new_status) {
            return Err(CoordinatorError::IllegalTransition {
                from: self.status,
                to: new_status,
            });
        }

        let timestamp = match self.latest_update_timestamp {
            Some(prev) if timestamp < prev => prev,
            _ => timestamp,
        };

        if new_status == TaskStatus::InProgress && self.start_timestamp.is_none() {
            self.start_timestamp = Some(timestamp);
        }

        let mut completion_percentage = completion_percentage;
        if new_status == TaskStatus::Completed {
            self.completion_timestamp = Some(timestamp);
            completion_percentage = Some(100.0);
        }

        self.status = new_status;
        if let Some(pct) = completion_percentage {
            self.completion_percentage = pct;
        }

        self.updates.push(ProgressUpdate {
            timestamp,
            status: new_status,
            completion_percentage: self.completion_percentage,
            notes,
        });
        self.latest_update_timestamp = Some(timestamp);
        Ok(())
    }

    /// Reopen a COMPLETED task back to IN_PROGRESS on user rejection.
    ///
    /// The only way to leave a terminal state. Clears the completion
    /// timestamp and resets the percentage; the update history keeps the
    /// full trail.
    pub fn reopen(&mut self, reason: Option<String>, timestamp: DateTime<Utc>) -> Result<()> {
        if self.status != TaskStatus::Completed {
            return Err(CoordinatorError::IllegalTransition {
                from: self.status,
                to: TaskStatus::InProgress,
            });
        }

        let timestamp = match self.latest_update_timestamp {
            Some(prev) if timestamp < prev => prev,
            _ => timestamp,
        };

        self.status = TaskStatus::InProgress;
        self.completion_timestamp = None;
        self.completion_percentage = 0.0;
        self.updates.push(ProgressUpdate {
            timestamp,
            status: TaskStatus::InProgress,
            completion_percentage: 0.0,
            notes: reason,
        });
        self.latest_update_timestamp = Some(timestamp);
        Ok(())
    }
}

// ============================================================================
// Rollups
// ============================================================================

/// Aggregate status of a milestone or phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupStatus {
    Completed,
    Blocked,
    InProgress,
    Pending,
}

/// Rollup over the tasks of one milestone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneProgress {
    pub milestone: String,
    pub status: RollupStatus,
    pub completion_percentage: f64,
    pub tasks_total: usize,
    pub tasks_completed: usize,
    pub tasks_in_progress: usize,
    pub tasks_blocked: usize,
    pub has_blocked_tasks: bool,
}

/// Rollup over the tasks of one execution phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseProgress {
    pub phase: usize,
    pub status: RollupStatus,
    pub completion_percentage: f64,
    pub tasks_total: usize,
    pub tasks_completed: usize,
}

/// Overall project status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Completed,
    Blocked,
    Issues,
    InProgress,
    Pending,
}

/// Whether the critical path keeps pace with the rest of the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalPathStatus {
    OnTrack,
    Behind,
}

/// Progress along the critical path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalPathProgress {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_percentage: f64,
    pub critical_status: CriticalPathStatus,
}

/// Task counts by status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub blocked: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub pending: usize,
}

/// Full project rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub timestamp: DateTime<Utc>,
    pub overall_status: OverallStatus,
    pub completion_percentage: f64,
    pub task_summary: TaskSummary,
    pub milestone_progress: Vec<MilestoneProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_path_progress: Option<CriticalPathProgress>,
    pub phases_summary: Vec<PhaseProgress>,
}

// ============================================================================
// Completion events & checkpoints
// ============================================================================

/// Everything that happened as a consequence of completing one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub task_id: TaskId,
    pub task_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_status: Option<MilestoneProgress>,
    pub phase_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_triggered: Option<String>,
    /// Tasks whose predecessors are now all COMPLETED
    pub unblocked_tasks: Vec<TaskId>,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a checkpoint verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointStatus {
    Verified,
    PartiallyVerified,
    NotVerified,
}

/// Result of `verify_checkpoint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointVerification {
    pub checkpoint_id: String,
    pub status: CheckpointStatus,
    pub message: String,
    pub phase_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_status: Option<MilestoneProgress>,
    pub critical_path_on_track: bool,
    pub completion_percentage: f64,
    pub overall_status: OverallStatus,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Bottlenecks
// ============================================================================

/// Severity of a bottleneck. Variant order is ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Why a task is considered a bottleneck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckKind {
    ExplicitlyBlocked,
    BlockingCompletedSuccessors,
    DelayedCriticalTask,
}

/// A task that is delaying or blocking progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bottleneck {
    pub task_id: TaskId,
    pub task_name: String,
    pub kind: BottleneckKind,
    pub status: TaskStatus,
    pub blocked_task_count: usize,
    pub impact: ImpactLevel,
    pub notes: String,
}

// ============================================================================
// Timeline adherence
// ============================================================================

/// Project-level schedule status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Ahead,
    OnSchedule,
    Behind,
    Unknown,
}

/// Per-phase schedule status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTimingStatus {
    Completed,
    CompletedEarly,
    CompletedOnTime,
    CompletedLate,
    InProgress,
    Delayed,
    Ahead,
    Pending,
}

impl PhaseTimingStatus {
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            PhaseTimingStatus::Completed
                | PhaseTimingStatus::CompletedEarly
                | PhaseTimingStatus::CompletedOnTime
                | PhaseTimingStatus::CompletedLate
        )
    }
}

/// Planned-versus-actual variance for one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseVariance {
    pub phase: usize,
    pub status: PhaseTimingStatus,
    pub planned_start_day: i64,
    pub planned_end_day: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_start_day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_end_day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_variance_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_variance_days: Option<i64>,
}

/// Planned-versus-actual analysis for the whole project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineAnalysis {
    pub status: ScheduleStatus,
    pub overall_variance_days: i64,
    pub is_on_schedule: bool,
    pub days_elapsed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_expected_phase: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_actual_phase: Option<usize>,
    pub phases_analysis: Vec<PhaseVariance>,
}

// ============================================================================
// At-risk classification
// ============================================================================

/// Risk level of a task. Variant order is ascending so risk factors can
/// accumulate with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// A contributing risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    CriticalPathTask,
    OverdueNotStarted,
    OverdueInProgress,
    ApproachingDeadline,
    HighEffortShortTimeline,
    BlockedDependency,
    FailedDependency,
    WaitingOnDependencies,
    ExplicitlyBlocked,
    ProjectBehindSchedule,
}

/// A non-terminal task whose accumulated risk is above NONE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtRiskTask {
    pub task_id: TaskId,
    pub task_name: String,
    pub current_status: TaskStatus,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<RiskFactor>,
    pub milestone: String,
    pub is_critical_path: bool,
    /// Predecessors that are not yet COMPLETED
    pub blocked_by: Vec<TaskId>,
}

// ============================================================================
// Progress report
// ============================================================================

/// High-level project health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectHealth {
    Completed,
    AtRisk,
    NeedsAttention,
    OnTrack,
}

/// A recent task update surfaced in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentUpdate {
    pub task_id: TaskId,
    pub task_name: String,
    pub timestamp: DateTime<Utc>,
    pub status: TaskStatus,
    pub completion_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Key metrics up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub completion_percentage: f64,
    pub status: OverallStatus,
    pub timeline_status: ScheduleStatus,
    pub variance_days: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_path_status: Option<CriticalPathStatus>,
    pub high_risk_tasks: usize,
    pub blocked_tasks: usize,
}

/// Structured progress report. Rendering is a consumer concern; this is
/// data only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub report_id: String,
    pub timestamp: DateTime<Utc>,
    pub project_health: ProjectHealth,
    pub executive_summary: ExecutiveSummary,
    pub milestone_summary: Vec<MilestoneProgress>,
    /// Updates from the last three days, newest first, capped at ten
    pub recent_activity: Vec<RecentUpdate>,
    /// Top bottlenecks by impact, capped at five
    pub bottlenecks: Vec<Bottleneck>,
    /// Top at-risk tasks, capped at five
    pub at_risk_tasks: Vec<AtRiskTask>,
    pub timeline_analysis: TimelineAnalysis,
    pub task_statistics: TaskSummary,
    pub recommendations: Vec<String>,
}
