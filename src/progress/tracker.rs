//! The progress tracker: serialized mutations over one plan's task
//! state, with rollups and completion-event propagation.

use super::models::{
    CheckpointStatus, CheckpointVerification, CompletionEvent, CriticalPathProgress,
    CriticalPathStatus, MilestoneProgress, OverallStatus, PhaseProgress, ProgressRecord,
    RollupStatus, TaskStatus, TaskSummary,
};
use crate::assign::models::ExecutionPlan;
use crate::error::{CoordinatorError, Result};
use crate::plan::models::{Task, TaskId};
use crate::progress::models::ProjectProgress;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};
use uuid::Uuid;

/// Round to one decimal place, matching the precision rollups are
/// reported at.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Live state of one plan: the immutable task set and execution plan,
/// plus the mutable progress records.
///
/// All mutation goes through `&mut self`, so wrapping the tracker in a
/// single writer lock serializes updates per plan.
pub struct ProgressTracker {
    plan_id: Uuid,
    tasks: BTreeMap<TaskId, Task>,
    milestones: Vec<String>,
    plan: ExecutionPlan,
    records: BTreeMap<TaskId, ProgressRecord>,
    config: crate::CoordinatorConfig,
}

impl ProgressTracker {
    /// Create a tracker with every task PENDING.
    pub fn new(
        plan_id: Uuid,
        tasks: BTreeMap<TaskId, Task>,
        milestones: Vec<String>,
        plan: ExecutionPlan,
        config: crate::CoordinatorConfig,
    ) -> Self {
        let records = tasks
            .keys()
            .map(|id| (id.clone(), ProgressRecord::new()))
            .collect();
        Self {
            plan_id,
            tasks,
            milestones,
            plan,
            records,
            config,
        }
    }

    pub(crate) fn config(&self) -> &crate::CoordinatorConfig {
        &self.config
    }

    pub fn plan_id(&self) -> Uuid {
        self.plan_id
    }

    pub fn tasks(&self) -> &BTreeMap<TaskId, Task> {
        &self.tasks
    }

    /// Milestone names in plan order.
    pub fn milestones(&self) -> &[String] {
        &self.milestones
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    pub fn record(&self, id: &TaskId) -> Result<&ProgressRecord> {
        self.records
            .get(id)
            .ok_or_else(|| CoordinatorError::UnknownTask(id.clone()))
    }

    pub(crate) fn records(&self) -> &BTreeMap<TaskId, ProgressRecord> {
        &self.records
    }

    fn status_of(&self, id: &TaskId) -> TaskStatus {
        self.records
            .get(id)
            .map(|r| r.status)
            .unwrap_or(TaskStatus::Pending)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Apply a status update to one task and return the updated record.
    pub fn update_status(
        &mut self,
        id: &TaskId,
        new_status: TaskStatus,
        completion_percentage: Option<f64>,
        notes: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<ProgressRecord> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| CoordinatorError::UnknownTask(id.clone()))?;
        record.apply(new_status, completion_percentage, notes, timestamp)?;
        info!(
            plan = %self.plan_id,
            task = %id,
            status = %new_status,
            completion = record.completion_percentage,
            "task status updated"
        );
        Ok(record.clone())
    }

    /// Reopen a COMPLETED task on user rejection.
    pub fn reopen_task(
        &mut self,
        id: &TaskId,
        reason: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<ProgressRecord> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| CoordinatorError::UnknownTask(id.clone()))?;
        record.reopen(reason, timestamp)?;
        info!(plan = %self.plan_id, task = %id, "task reopened");
        Ok(record.clone())
    }

    /// Complete a task and propagate the consequences: milestone rollup,
    /// phase completion, checkpoint firing, and newly unblocked tasks.
    pub fn complete_task(
        &mut self,
        id: &TaskId,
        result_summary: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<CompletionEvent> {
        let task_name = self
            .tasks
            .get(id)
            .map(|t| t.name.clone())
            .ok_or_else(|| CoordinatorError::UnknownTask(id.clone()))?;

        {
            let record = self
                .records
                .get_mut(id)
                .ok_or_else(|| CoordinatorError::UnknownTask(id.clone()))?;
            record.apply(TaskStatus::Completed, Some(100.0), result_summary, timestamp)?;
        }

        let milestone_status = self
            .tasks
            .get(id)
            .map(|t| t.milestone.clone())
            .map(|m| self.milestone_progress(&m));

        let current_phase = self.plan.schedule.phase_of(id);
        let phase_completed = current_phase
            .map(|phase| self.phase_is_completed(phase))
            .unwrap_or(false);

        let checkpoint_triggered = current_phase.filter(|_| phase_completed).and_then(|phase| {
            self.plan
                .schedule
                .checkpoints
                .iter()
                .find(|c| c.after_phase == phase)
                .map(|c| c.checkpoint_id.clone())
        });

        let unblocked_tasks = self.newly_unblocked(id);

        debug!(
            plan = %self.plan_id,
            task = %id,
            phase_completed,
            unblocked = unblocked_tasks.len(),
            "completion propagated"
        );

        Ok(CompletionEvent {
            task_id: id.clone(),
            task_name,
            milestone_status,
            phase_completed,
            current_phase,
            checkpoint_triggered,
            unblocked_tasks,
            timestamp,
        })
    }

    /// Tasks that depend on `completed` and now have every predecessor
    /// COMPLETED.
    fn newly_unblocked(&self, completed: &TaskId) -> Vec<TaskId> {
        self.tasks
            .values()
            .filter(|task| {
                matches!(
                    self.status_of(&task.id),
                    TaskStatus::Pending | TaskStatus::Blocked
                ) && task.depends_on(completed)
                    && task
                        .predecessors()
                        .all(|p| self.status_of(p) == TaskStatus::Completed)
            })
            .map(|task| task.id.clone())
            .collect()
    }

    // ========================================================================
    // Rollups
    // ========================================================================

    fn rollup_over<'a>(&self, ids: impl Iterator<Item = &'a TaskId>) -> (RollupStatus, f64, TaskSummary) {
        let mut summary = TaskSummary::default();
        let mut total_percentage = 0.0;

        for id in ids {
            summary.total += 1;
            let record = match self.records.get(id) {
                Some(r) => r,
                None => continue,
            };
            match record.status {
                TaskStatus::Completed => {
                    summary.completed += 1;
                    total_percentage += 100.0;
                }
                TaskStatus::InProgress => {
                    summary.in_progress += 1;
                    total_percentage += record.completion_percentage;
                }
                TaskStatus::Blocked => summary.blocked += 1,
                TaskStatus::Failed => summary.failed += 1,
                TaskStatus::Cancelled => summary.cancelled += 1,
                TaskStatus::Pending => summary.pending += 1,
            }
        }

        let percentage = if summary.total > 0 {
            round1(total_percentage / summary.total as f64)
        } else {
            0.0
        };
        let status = if summary.total > 0 && summary.completed == summary.total {
            RollupStatus::Completed
        } else if summary.blocked > 0 {
            RollupStatus::Blocked
        } else if summary.in_progress > 0 {
            RollupStatus::InProgress
        } else {
            RollupStatus::Pending
        };
        (status, percentage, summary)
    }

    /// Rollup for one milestone.
    pub fn milestone_progress(&self, milestone: &str) -> MilestoneProgress {
        let ids: Vec<&TaskId> = self
            .tasks
            .values()
            .filter(|t| t.milestone == milestone)
            .map(|t| &t.id)
            .collect();
        let (status, completion_percentage, summary) = self.rollup_over(ids.into_iter());
        MilestoneProgress {
            milestone: milestone.to_string(),
            status,
            completion_percentage,
            tasks_total: summary.total,
            tasks_completed: summary.completed,
            tasks_in_progress: summary.in_progress,
            tasks_blocked: summary.blocked,
            has_blocked_tasks: summary.blocked > 0,
        }
    }

    /// Rollup per execution phase.
    pub fn phases_progress(&self) -> Vec<PhaseProgress> {
        self.plan
            .schedule
            .phases
            .iter()
            .map(|group| {
                let (status, completion_percentage, summary) =
                    self.rollup_over(group.tasks.iter());
                PhaseProgress {
                    phase: group.phase,
                    status,
                    completion_percentage,
                    tasks_total: summary.total,
                    tasks_completed: summary.completed,
                }
            })
            .collect()
    }

    fn phase_is_completed(&self, phase: usize) -> bool {
        self.plan
            .schedule
            .phases
            .iter()
            .find(|g| g.phase == phase)
            .map(|g| {
                !g.tasks.is_empty()
                    && g.tasks
                        .iter()
                        .all(|id| self.status_of(id) == TaskStatus::Completed)
            })
            .unwrap_or(false)
    }

    /// Full project rollup.
    pub fn project_progress(&self) -> ProjectProgress {
        let (_, completion_percentage, task_summary) = self.rollup_over(self.tasks.keys());

        let overall_status = if task_summary.total > 0 && task_summary.completed == task_summary.total
        {
            OverallStatus::Completed
        } else if task_summary.blocked > 0 {
            OverallStatus::Blocked
        } else if task_summary.failed > 0 {
            OverallStatus::Issues
        } else if task_summary.in_progress > 0 {
            OverallStatus::InProgress
        } else {
            OverallStatus::Pending
        };

        let milestone_progress = self
            .milestones
            .iter()
            .map(|m| self.milestone_progress(m))
            .collect();

        let critical_path = &self.plan.schedule.critical_path;
        let critical_path_progress = if critical_path.is_empty() {
            None
        } else {
            let completed = critical_path
                .iter()
                .filter(|id| self.status_of(id) == TaskStatus::Completed)
                .count();
            let percentage = round1(completed as f64 / critical_path.len() as f64 * 100.0);
            Some(CriticalPathProgress {
                total_tasks: critical_path.len(),
                completed_tasks: completed,
                completion_percentage: percentage,
                critical_status: if percentage >= completion_percentage {
                    CriticalPathStatus::OnTrack
                } else {
                    CriticalPathStatus::Behind
                },
            })
        };

        ProjectProgress {
            timestamp: Utc::now(),
            overall_status,
            completion_percentage,
            task_summary,
            milestone_progress,
            critical_path_progress,
            phases_summary: self.phases_progress(),
        }
    }

    // ========================================================================
    // Checkpoints
    // ========================================================================

    /// Verify a checkpoint: its phase must be COMPLETED, and its
    /// milestone (when one is recorded) must be COMPLETED too.
    pub fn verify_checkpoint(&self, checkpoint_id: &str) -> Result<CheckpointVerification> {
        let checkpoint = self
            .plan
            .schedule
            .checkpoints
            .iter()
            .find(|c| c.checkpoint_id == checkpoint_id)
            .ok_or_else(|| CoordinatorError::UnknownCheckpoint(checkpoint_id.to_string()))?;

        let phase_completed = self.phase_is_completed(checkpoint.after_phase);
        let milestone_status = checkpoint
            .milestone_reached
            .as_ref()
            .map(|m| self.milestone_progress(m));
        let milestone_completed = milestone_status
            .as_ref()
            .map(|m| m.status == RollupStatus::Completed);

        let (status, message) = match (phase_completed, milestone_completed) {
            (true, None) | (true, Some(true)) => (
                CheckpointStatus::Verified,
                format!("checkpoint {checkpoint_id} successfully reached"),
            ),
            (true, Some(false)) => (
                CheckpointStatus::PartiallyVerified,
                format!(
                    "phase completed but milestone '{}' not fully completed",
                    checkpoint.milestone_reached.as_deref().unwrap_or_default()
                ),
            ),
            (false, _) => (
                CheckpointStatus::NotVerified,
                format!("phase {} not completed yet", checkpoint.after_phase),
            ),
        };

        let progress = self.project_progress();
        Ok(CheckpointVerification {
            checkpoint_id: checkpoint_id.to_string(),
            status,
            message,
            phase_completed,
            milestone_status,
            critical_path_on_track: progress
                .critical_path_progress
                .as_ref()
                .map(|c| c.critical_status == CriticalPathStatus::OnTrack)
                .unwrap_or(false),
            completion_percentage: progress.completion_percentage,
            overall_status: progress.overall_status,
            timestamp: Utc::now(),
        })
    }

    // ========================================================================
    // Graph helpers shared with analysis
    // ========================================================================

    /// Direct successors of every task.
    pub(crate) fn successor_map(&self) -> BTreeMap<&TaskId, Vec<&TaskId>> {
        let mut successors: BTreeMap<&TaskId, Vec<&TaskId>> =
            self.tasks.keys().map(|id| (id, Vec::new())).collect();
        for task in self.tasks.values() {
            for pred in task.predecessors() {
                if let Some(succs) = successors.get_mut(pred) {
                    succs.push(&task.id);
                }
            }
        }
        successors
    }

    /// Number of transitive successors of `id` (DFS, excluding `id`).
    pub(crate) fn transitive_successor_count(
        &self,
        id: &TaskId,
        successors: &BTreeMap<&TaskId, Vec<&TaskId>>,
    ) -> usize {
        let mut visited: BTreeSet<&TaskId> = BTreeSet::new();
        let mut stack: Vec<&TaskId> = successors.get(id).cloned().unwrap_or_default();
        while let Some(next) = stack.pop() {
            if visited.insert(next) {
                if let Some(more) = successors.get(next) {
                    stack.extend(more.iter().copied());
                }
            }
        }
        visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::build_execution_plan;
    use crate::plan::models::{AgentType, Effort};
    use crate::schedule::build_schedule;
    use crate::CoordinatorConfig;

    fn task(id: &str, milestone: &str, milestone_index: usize, effort: Effort, deps: &[&str]) -> Task {
        Task {
            id: TaskId::from(id),
            name: format!("Task {id}"),
            milestone: milestone.into(),
            milestone_index,
            effort,
            description: String::new(),
            declared_predecessors: deps.iter().map(|d| TaskId::from(*d)).collect(),
            inferred_predecessors: BTreeSet::new(),
            skill_requirements: [(AgentType::FullStackDeveloper, 0.8)].into_iter().collect(),
        }
    }

    fn tracker_for(tasks: Vec<Task>, milestones: Vec<&str>) -> ProgressTracker {
        let map: BTreeMap<TaskId, Task> =
            tasks.into_iter().map(|t| (t.id.clone(), t)).collect();
        let schedule = build_schedule(&map).unwrap();
        let plan = build_execution_plan(&map, schedule, &CoordinatorConfig::default());
        ProgressTracker::new(
            Uuid::new_v4(),
            map,
            milestones.into_iter().map(String::from).collect(),
            plan,
            CoordinatorConfig::default(),
        )
    }

    fn three_task_tracker() -> ProgressTracker {
        tracker_for(
            vec![
                task("a", "M", 0, Effort::Medium, &[]),
                task("b", "M", 0, Effort::Medium, &[]),
                task("c", "M", 0, Effort::Medium, &[]),
            ],
            vec!["M"],
        )
    }

    // ========================================================================
    // Status updates
    // ========================================================================

    #[test]
    fn test_update_unknown_task_fails() {
        let mut tracker = three_task_tracker();
        let err = tracker
            .update_status(
                &TaskId::from("ghost"),
                TaskStatus::InProgress,
                None,
                None,
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::UnknownTask(_)));
    }

    #[test]
    fn test_update_returns_record() {
        let mut tracker = three_task_tracker();
        let record = tracker
            .update_status(
                &TaskId::from("a"),
                TaskStatus::InProgress,
                Some(25.0),
                Some("started".into()),
                Utc::now(),
            )
            .unwrap();
        assert_eq!(record.status, TaskStatus::InProgress);
        assert_eq!(record.completion_percentage, 25.0);
        assert_eq!(record.updates.len(), 1);
    }

    // ========================================================================
    // Milestone rollup
    // ========================================================================

    #[test]
    fn test_milestone_rollup_mixed_statuses() {
        let mut tracker = three_task_tracker();
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        tracker.complete_task(&TaskId::from("a"), None, now).unwrap();
        tracker
            .update_status(&TaskId::from("b"), TaskStatus::InProgress, Some(50.0), None, now)
            .unwrap();

        let milestone = tracker.milestone_progress("M");
        assert_eq!(milestone.status, RollupStatus::InProgress);
        assert_eq!(milestone.completion_percentage, 50.0);
        assert_eq!(milestone.tasks_completed, 1);
        assert_eq!(milestone.tasks_in_progress, 1);
        assert!(!milestone.has_blocked_tasks);
    }

    #[test]
    fn test_milestone_completed_when_all_done() {
        let mut tracker = three_task_tracker();
        let now = Utc::now();
        for id in ["a", "b", "c"] {
            let tid = TaskId::from(id);
            tracker
                .update_status(&tid, TaskStatus::InProgress, None, None, now)
                .unwrap();
            tracker.complete_task(&tid, None, now).unwrap();
        }
        let milestone = tracker.milestone_progress("M");
        assert_eq!(milestone.status, RollupStatus::Completed);
        assert_eq!(milestone.completion_percentage, 100.0);
    }

    #[test]
    fn test_blocked_dominates_in_progress() {
        let mut tracker = three_task_tracker();
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        tracker
            .update_status(&TaskId::from("b"), TaskStatus::Blocked, None, None, now)
            .unwrap();
        let milestone = tracker.milestone_progress("M");
        assert_eq!(milestone.status, RollupStatus::Blocked);
        assert!(milestone.has_blocked_tasks);
    }

    // ========================================================================
    // Project rollup
    // ========================================================================

    #[test]
    fn test_project_progress_monotonic_on_completion() {
        let mut tracker = three_task_tracker();
        let now = Utc::now();
        let before = tracker.project_progress().completion_percentage;

        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        tracker.complete_task(&TaskId::from("a"), None, now).unwrap();
        let after = tracker.project_progress().completion_percentage;

        assert!(after > before, "completion should strictly increase");
    }

    #[test]
    fn test_overall_status_issues_when_failed() {
        let mut tracker = three_task_tracker();
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::Failed, None, None, now)
            .unwrap();
        let progress = tracker.project_progress();
        assert_eq!(progress.overall_status, OverallStatus::Issues);
        assert_eq!(progress.task_summary.failed, 1);
    }

    #[test]
    fn test_critical_path_progress_tracks_completion() {
        let mut tracker = tracker_for(
            vec![
                task("a", "M", 0, Effort::Medium, &[]),
                task("b", "M", 0, Effort::Medium, &["a"]),
            ],
            vec!["M"],
        );
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        tracker.complete_task(&TaskId::from("a"), None, now).unwrap();

        let progress = tracker.project_progress();
        let critical = progress.critical_path_progress.unwrap();
        assert_eq!(critical.total_tasks, 2);
        assert_eq!(critical.completed_tasks, 1);
        assert_eq!(critical.critical_status, CriticalPathStatus::OnTrack);
    }

    // ========================================================================
    // Completion events
    // ========================================================================

    #[test]
    fn test_completion_unblocks_dependents() {
        let mut tracker = tracker_for(
            vec![
                task("a", "M", 0, Effort::Medium, &[]),
                task("b", "M", 0, Effort::Medium, &["a"]),
                task("c", "M", 0, Effort::Medium, &["a", "b"]),
            ],
            vec!["M"],
        );
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        let event = tracker.complete_task(&TaskId::from("a"), None, now).unwrap();

        // b has all predecessors done; c still waits on b.
        assert_eq!(event.unblocked_tasks, vec![TaskId::from("b")]);
        assert!(event.phase_completed, "phase 1 held only task a");
    }

    #[test]
    fn test_completion_event_carries_milestone_status() {
        let mut tracker = three_task_tracker();
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        let event = tracker.complete_task(&TaskId::from("a"), None, now).unwrap();
        let milestone = event.milestone_status.unwrap();
        assert_eq!(milestone.milestone, "M");
        assert_eq!(milestone.tasks_completed, 1);
        assert!(!event.phase_completed, "two siblings still pending");
    }

    #[test]
    fn test_checkpoint_fires_once_phase_completes() {
        // Chain of three tasks -> three phases -> checkpoint after phase 3.
        let mut tracker = tracker_for(
            vec![
                task("a", "M", 0, Effort::Medium, &[]),
                task("b", "M", 0, Effort::Medium, &["a"]),
                task("c", "M", 0, Effort::Medium, &["b"]),
            ],
            vec!["M"],
        );
        let now = Utc::now();
        for id in ["a", "b"] {
            let tid = TaskId::from(id);
            tracker
                .update_status(&tid, TaskStatus::InProgress, None, None, now)
                .unwrap();
            let event = tracker.complete_task(&tid, None, now).unwrap();
            assert!(event.checkpoint_triggered.is_none());
        }
        let tid = TaskId::from("c");
        tracker
            .update_status(&tid, TaskStatus::InProgress, None, None, now)
            .unwrap();
        let event = tracker.complete_task(&tid, None, now).unwrap();
        assert_eq!(event.checkpoint_triggered.as_deref(), Some("checkpoint_1"));
    }

    // ========================================================================
    // Checkpoint verification
    // ========================================================================

    #[test]
    fn test_verify_unknown_checkpoint() {
        let tracker = three_task_tracker();
        let err = tracker.verify_checkpoint("checkpoint_99").unwrap_err();
        assert!(matches!(err, CoordinatorError::UnknownCheckpoint(_)));
    }

    #[test]
    fn test_verify_checkpoint_lifecycle() {
        let mut tracker = tracker_for(
            vec![
                task("a", "M", 0, Effort::Medium, &[]),
                task("b", "M", 0, Effort::Medium, &["a"]),
                task("c", "M", 0, Effort::Medium, &["b"]),
            ],
            vec!["M"],
        );
        let now = Utc::now();

        let verification = tracker.verify_checkpoint("checkpoint_1").unwrap();
        assert_eq!(verification.status, CheckpointStatus::NotVerified);

        for id in ["a", "b", "c"] {
            let tid = TaskId::from(id);
            tracker
                .update_status(&tid, TaskStatus::InProgress, None, None, now)
                .unwrap();
            tracker.complete_task(&tid, None, now).unwrap();
        }

        let verification = tracker.verify_checkpoint("checkpoint_1").unwrap();
        assert_eq!(verification.status, CheckpointStatus::Verified);
        assert!(verification.phase_completed);
    }

    #[test]
    fn test_partially_verified_when_milestone_lags() {
        // Phase 3 is completed but milestone "Late" still has an open task
        // in a later phase.
        let mut tracker = tracker_for(
            vec![
                task("a", "Early", 0, Effort::Low, &[]),
                task("b", "Early", 0, Effort::Low, &["a"]),
                task("c", "Late", 1, Effort::Low, &["b"]),
                task("d", "Late", 1, Effort::Low, &["c"]),
            ],
            vec!["Early", "Late"],
        );
        let now = Utc::now();
        for id in ["a", "b", "c"] {
            let tid = TaskId::from(id);
            tracker
                .update_status(&tid, TaskStatus::InProgress, None, None, now)
                .unwrap();
            tracker.complete_task(&tid, None, now).unwrap();
        }

        let verification = tracker.verify_checkpoint("checkpoint_1").unwrap();
        assert_eq!(verification.status, CheckpointStatus::PartiallyVerified);
    }

    // ========================================================================
    // Graph helpers
    // ========================================================================

    #[test]
    fn test_transitive_successor_count() {
        let tracker = tracker_for(
            vec![
                task("a", "M", 0, Effort::Low, &[]),
                task("b", "M", 0, Effort::Low, &["a"]),
                task("c", "M", 0, Effort::Low, &["b"]),
                task("d", "M", 0, Effort::Low, &["b"]),
            ],
            vec!["M"],
        );
        let successors = tracker.successor_map();
        assert_eq!(
            tracker.transitive_successor_count(&TaskId::from("a"), &successors),
            3
        );
        assert_eq!(
            tracker.transitive_successor_count(&TaskId::from("b"), &successors),
            2
        );
        assert_eq!(
            tracker.transitive_successor_count(&TaskId::from("d"), &successors),
            0
        );
    }
}
