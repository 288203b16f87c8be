//! The coordinator facade: plan ingest through progress analytics.
//!
//! Each submitted plan gets one protected region (a writer lock over
//! its progress tracker); reads share the lock, mutations serialize on
//! it, and progress events are emitted while the write lock is held so
//! per-task event order matches call order.

use crate::assign::build_execution_plan;
use crate::assign::models::{Instruction, PlanValidation};
use crate::error::{CoordinatorError, Result};
use crate::events::{EventBus, EventKind, ProgressEvent};
use crate::plan::builder::ingest_plan;
use crate::plan::models::{AgentType, Plan, PlanAnalysis, TaskId};
use crate::progress::models::{
    AtRiskTask, Bottleneck, CheckpointVerification, CompletionEvent, ProgressRecord,
    ProgressReport, ProjectProgress, RollupStatus, TaskStatus, TimelineAnalysis,
};
use crate::progress::tracker::ProgressTracker;
use crate::schedule::{build_schedule, Schedule};
use crate::CoordinatorConfig;
use chrono::Utc;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::info;
use uuid::Uuid;

/// Identifier of a submitted plan.
pub type PlanId = Uuid;

struct PlanEntry {
    tracker: RwLock<ProgressTracker>,
    analysis: PlanAnalysis,
    warnings: Vec<String>,
}

/// Structural overview of a submitted plan.
#[derive(Debug, Clone)]
pub struct PlanOverview {
    pub analysis: PlanAnalysis,
    pub warnings: Vec<String>,
}

/// Entry point for the execution-coordination core.
///
/// Owns the plan registry and the event bus. All state is reachable
/// from here; there are no globals.
pub struct Coordinator {
    config: CoordinatorConfig,
    bus: EventBus,
    plans: DashMap<PlanId, Arc<PlanEntry>>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

impl Coordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            bus: EventBus::default(),
            plans: DashMap::new(),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Subscribe to progress events. Events carry their plan id and
    /// kind; filtering is the subscriber's concern.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.bus.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    fn entry(&self, plan_id: PlanId) -> Result<Arc<PlanEntry>> {
        self.plans
            .get(&plan_id)
            .map(|e| e.value().clone())
            .ok_or(CoordinatorError::UnknownPlan(plan_id))
    }

    // ========================================================================
    // Plan ingest
    // ========================================================================

    /// Ingest a plan, schedule it, and build assignments.
    ///
    /// The plan is registered even when validation reports issues
    /// (`validate_plan` exposes them); only structural failures —
    /// invalid input or a dependency cycle — abort submission.
    pub fn submit_plan(&self, plan: &Plan) -> Result<PlanId> {
        let ingested = ingest_plan(plan)?;
        let schedule = build_schedule(&ingested.tasks)?;
        let execution_plan = build_execution_plan(&ingested.tasks, schedule, &self.config);

        let plan_id = Uuid::new_v4();
        let tracker = ProgressTracker::new(
            plan_id,
            ingested.tasks,
            ingested.milestones,
            execution_plan,
            self.config.clone(),
        );
        self.plans.insert(
            plan_id,
            Arc::new(PlanEntry {
                tracker: RwLock::new(tracker),
                analysis: ingested.analysis,
                warnings: ingested.warnings,
            }),
        );
        info!(plan = %plan_id, name = %plan.name, "plan submitted");
        Ok(plan_id)
    }

    /// The full schedule (timing, critical path, phases, checkpoints,
    /// timeline) for a plan.
    pub async fn get_schedule(&self, plan_id: PlanId) -> Result<Schedule> {
        let entry = self.entry(plan_id)?;
        let tracker = entry.tracker.read().await;
        Ok(tracker.plan().schedule.clone())
    }

    /// Per-agent instruction queues.
    pub async fn get_assignments(
        &self,
        plan_id: PlanId,
    ) -> Result<BTreeMap<AgentType, Vec<Instruction>>> {
        let entry = self.entry(plan_id)?;
        let tracker = entry.tracker.read().await;
        Ok(tracker.plan().assignments.clone())
    }

    /// Validation outcome for a plan. The plan remains available even
    /// when invalid so tooling can render it alongside the issues.
    pub async fn validate_plan(&self, plan_id: PlanId) -> Result<PlanValidation> {
        let entry = self.entry(plan_id)?;
        let tracker = entry.tracker.read().await;
        Ok(tracker.plan().validation.clone())
    }

    /// Ingestion analysis and warnings.
    pub fn plan_overview(&self, plan_id: PlanId) -> Result<PlanOverview> {
        let entry = self.entry(plan_id)?;
        Ok(PlanOverview {
            analysis: entry.analysis.clone(),
            warnings: entry.warnings.clone(),
        })
    }

    // ========================================================================
    // Progress & events
    // ========================================================================

    /// Apply a status update to a task and broadcast the change.
    pub async fn update_task_status(
        &self,
        plan_id: PlanId,
        task_id: &TaskId,
        new_status: TaskStatus,
        completion_percentage: Option<f64>,
        notes: Option<String>,
    ) -> Result<ProgressRecord> {
        let entry = self.entry(plan_id)?;
        let mut tracker = entry.tracker.write().await;
        let record =
            tracker.update_status(task_id, new_status, completion_percentage, notes, Utc::now())?;

        self.bus.emit(
            ProgressEvent::new(EventKind::TaskStatusChanged, plan_id, task_id.as_str())
                .with_payload(serde_json::json!({
                    "status": record.status,
                    "completion_percentage": record.completion_percentage,
                })),
        );
        Ok(record)
    }

    /// Complete a task, propagate the consequences, and broadcast every
    /// derived event (task, phase, checkpoint, milestone).
    pub async fn complete_task(
        &self,
        plan_id: PlanId,
        task_id: &TaskId,
        result_summary: Option<String>,
    ) -> Result<CompletionEvent> {
        let entry = self.entry(plan_id)?;
        let mut tracker = entry.tracker.write().await;
        let event = tracker.complete_task(task_id, result_summary, Utc::now())?;

        self.bus.emit(
            ProgressEvent::new(EventKind::TaskCompleted, plan_id, task_id.as_str()).with_payload(
                serde_json::json!({
                    "unblocked_tasks": event.unblocked_tasks,
                    "phase_completed": event.phase_completed,
                }),
            ),
        );
        if event.phase_completed {
            if let Some(phase) = event.current_phase {
                self.bus.emit(ProgressEvent::new(
                    EventKind::PhaseCompleted,
                    plan_id,
                    phase.to_string(),
                ));
            }
        }
        if let Some(checkpoint_id) = &event.checkpoint_triggered {
            self.bus.emit(ProgressEvent::new(
                EventKind::CheckpointTriggered,
                plan_id,
                checkpoint_id.clone(),
            ));
        }
        if let Some(milestone) = &event.milestone_status {
            if milestone.status == RollupStatus::Completed {
                self.bus.emit(ProgressEvent::new(
                    EventKind::MilestoneCompleted,
                    plan_id,
                    milestone.milestone.clone(),
                ));
            }
        }
        Ok(event)
    }

    /// Reopen a COMPLETED task on user rejection.
    pub async fn reopen_task(
        &self,
        plan_id: PlanId,
        task_id: &TaskId,
        reason: Option<String>,
    ) -> Result<ProgressRecord> {
        let entry = self.entry(plan_id)?;
        let mut tracker = entry.tracker.write().await;
        let record = tracker.reopen_task(task_id, reason, Utc::now())?;

        self.bus.emit(
            ProgressEvent::new(EventKind::TaskStatusChanged, plan_id, task_id.as_str())
                .with_payload(serde_json::json!({
                    "status": record.status,
                    "reopened": true,
                })),
        );
        Ok(record)
    }

    /// Full project rollup.
    pub async fn get_project_progress(&self, plan_id: PlanId) -> Result<ProjectProgress> {
        let entry = self.entry(plan_id)?;
        let tracker = entry.tracker.read().await;
        Ok(tracker.project_progress())
    }

    /// Current bottlenecks, most severe first.
    pub async fn get_bottlenecks(&self, plan_id: PlanId) -> Result<Vec<Bottleneck>> {
        let entry = self.entry(plan_id)?;
        let tracker = entry.tracker.read().await;
        Ok(tracker.bottlenecks(Utc::now()))
    }

    /// Tasks whose accumulated risk is above NONE.
    pub async fn get_at_risk_tasks(&self, plan_id: PlanId) -> Result<Vec<AtRiskTask>> {
        let entry = self.entry(plan_id)?;
        let tracker = entry.tracker.read().await;
        Ok(tracker.at_risk_tasks(Utc::now()))
    }

    /// Planned-versus-actual timeline analysis.
    pub async fn get_timeline_analysis(&self, plan_id: PlanId) -> Result<TimelineAnalysis> {
        let entry = self.entry(plan_id)?;
        let tracker = entry.tracker.read().await;
        Ok(tracker.timeline_adherence(Utc::now()))
    }

    /// The structured progress report.
    pub async fn get_progress_report(&self, plan_id: PlanId) -> Result<ProgressReport> {
        let entry = self.entry(plan_id)?;
        let tracker = entry.tracker.read().await;
        Ok(tracker.progress_report(Utc::now()))
    }

    /// Verify a checkpoint against its phase and milestone.
    pub async fn verify_checkpoint(
        &self,
        plan_id: PlanId,
        checkpoint_id: &str,
    ) -> Result<CheckpointVerification> {
        let entry = self.entry(plan_id)?;
        let tracker = entry.tracker.read().await;
        tracker.verify_checkpoint(checkpoint_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::models::{Effort, Milestone, TaskSpec};

    fn spec(id: &str, name: &str, deps: &[&str], effort: Effort) -> TaskSpec {
        TaskSpec {
            id: Some(id.to_string()),
            name: name.to_string(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            effort,
            description: None,
        }
    }

    fn sample_plan() -> Plan {
        Plan {
            name: "Sample".into(),
            milestones: vec![Milestone {
                name: "Build".into(),
                tasks: vec![
                    spec("a", "Implement core", &[], Effort::Medium),
                    spec("b", "Implement api", &["a"], Effort::Medium),
                ],
            }],
            resource_pool: vec![],
        }
    }

    #[tokio::test]
    async fn test_submit_and_query_plan() {
        let coordinator = Coordinator::default();
        let plan_id = coordinator.submit_plan(&sample_plan()).unwrap();

        let schedule = coordinator.get_schedule(plan_id).await.unwrap();
        assert_eq!(schedule.nodes.len(), 2);
        assert!(schedule.timeline.is_some());

        let assignments = coordinator.get_assignments(plan_id).await.unwrap();
        let total: usize = assignments.values().map(|q| q.len()).sum();
        assert_eq!(total, 2);

        let validation = coordinator.validate_plan(plan_id).await.unwrap();
        assert!(validation.is_valid, "{:?}", validation.issues);

        let overview = coordinator.plan_overview(plan_id).unwrap();
        assert_eq!(overview.analysis.total_tasks, 2);
    }

    #[tokio::test]
    async fn test_unknown_plan_errors() {
        let coordinator = Coordinator::default();
        let err = coordinator.get_schedule(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::UnknownPlan(_)));
    }

    #[tokio::test]
    async fn test_status_update_emits_event() {
        let coordinator = Coordinator::default();
        let plan_id = coordinator.submit_plan(&sample_plan()).unwrap();
        let mut rx = coordinator.subscribe();

        coordinator
            .update_task_status(
                plan_id,
                &TaskId::from("a"),
                TaskStatus::InProgress,
                Some(20.0),
                None,
            )
            .await
            .unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, EventKind::TaskStatusChanged);
        assert_eq!(event.plan_id, plan_id);
        assert_eq!(event.entity_id, "a");
        assert_eq!(event.payload["status"], "in_progress");
    }

    #[tokio::test]
    async fn test_completion_emits_cascade() {
        let coordinator = Coordinator::default();
        let plan_id = coordinator.submit_plan(&sample_plan()).unwrap();
        let mut rx = coordinator.subscribe();

        for id in ["a", "b"] {
            let task = TaskId::from(id);
            coordinator
                .update_task_status(plan_id, &task, TaskStatus::InProgress, None, None)
                .await
                .unwrap();
            coordinator.complete_task(plan_id, &task, None).await.unwrap();
        }

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(event.kind);
        }
        assert!(kinds.contains(&EventKind::TaskCompleted));
        assert!(kinds.contains(&EventKind::PhaseCompleted));
        assert!(kinds.contains(&EventKind::MilestoneCompleted));
    }

    #[tokio::test]
    async fn test_reopen_round_trip() {
        let coordinator = Coordinator::default();
        let plan_id = coordinator.submit_plan(&sample_plan()).unwrap();
        let task = TaskId::from("a");

        coordinator
            .update_task_status(plan_id, &task, TaskStatus::InProgress, None, None)
            .await
            .unwrap();
        coordinator.complete_task(plan_id, &task, None).await.unwrap();
        let record = coordinator
            .reopen_task(plan_id, &task, Some("rework needed".into()))
            .await
            .unwrap();
        assert_eq!(record.status, TaskStatus::InProgress);

        let event = coordinator.complete_task(plan_id, &task, None).await.unwrap();
        assert_eq!(event.task_id, task);

        let record = {
            let entry = coordinator.entry(plan_id).unwrap();
            let tracker = entry.tracker.read().await;
            tracker.record(&task).unwrap().clone()
        };
        assert!(record.updates.len() >= 3);
        assert_eq!(record.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_progress_reflects_updates_immediately() {
        let coordinator = Coordinator::default();
        let plan_id = coordinator.submit_plan(&sample_plan()).unwrap();
        let task = TaskId::from("a");

        coordinator
            .update_task_status(plan_id, &task, TaskStatus::InProgress, Some(50.0), None)
            .await
            .unwrap();

        let progress = coordinator.get_project_progress(plan_id).await.unwrap();
        assert_eq!(progress.completion_percentage, 25.0);
        assert_eq!(progress.task_summary.in_progress, 1);
    }
}
