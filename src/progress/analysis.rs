//! Risk analytics over live progress: bottleneck detection, timeline
//! adherence, at-risk classification, and the structured progress report.

use super::models::{
    AtRiskTask, Bottleneck, BottleneckKind, ExecutiveSummary, ImpactLevel, OverallStatus,
    PhaseTimingStatus, PhaseVariance, ProgressReport, ProjectHealth, RecentUpdate, RiskFactor,
    RiskLevel, ScheduleStatus, TaskStatus, TimelineAnalysis,
};
use super::tracker::ProgressTracker;
use crate::plan::models::{Effort, TaskId};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Reverse;
use tracing::{debug, info};

impl ProgressTracker {
    // ========================================================================
    // Bottleneck detection
    // ========================================================================

    /// Tasks that are delaying or blocking progress, most severe first.
    pub fn bottlenecks(&self, now: DateTime<Utc>) -> Vec<Bottleneck> {
        let successors = self.successor_map();
        let mut bottlenecks = Vec::new();

        for task in self.tasks().values() {
            let record = match self.records().get(&task.id) {
                Some(r) => r,
                None => continue,
            };

            // Explicitly blocked tasks, weighted by downstream reach.
            if record.status == TaskStatus::Blocked {
                let downstream = self.transitive_successor_count(&task.id, &successors);
                bottlenecks.push(Bottleneck {
                    task_id: task.id.clone(),
                    task_name: task.name.clone(),
                    kind: BottleneckKind::ExplicitlyBlocked,
                    status: record.status,
                    blocked_task_count: downstream,
                    impact: if downstream > 2 {
                        ImpactLevel::High
                    } else {
                        ImpactLevel::Medium
                    },
                    notes: record
                        .updates
                        .last()
                        .and_then(|u| u.notes.clone())
                        .unwrap_or_else(|| "no details available".into()),
                });
            }

            // Open tasks whose direct successors already completed out of
            // order.
            if !record.status.is_terminal() {
                let completed_successors = successors
                    .get(&task.id)
                    .map(|succs| {
                        succs
                            .iter()
                            .filter(|s| {
                                self.records()
                                    .get(**s)
                                    .map(|r| r.status == TaskStatus::Completed)
                                    .unwrap_or(false)
                            })
                            .count()
                    })
                    .unwrap_or(0);
                if completed_successors > 0 {
                    bottlenecks.push(Bottleneck {
                        task_id: task.id.clone(),
                        task_name: task.name.clone(),
                        kind: BottleneckKind::BlockingCompletedSuccessors,
                        status: record.status,
                        blocked_task_count: completed_successors,
                        impact: ImpactLevel::Medium,
                        notes: "task is preventing proper sequence completion".into(),
                    });
                }
            }

            // Critical-path tasks running past their estimated duration.
            if self.plan().schedule.is_critical(&task.id)
                && record.status == TaskStatus::InProgress
            {
                if let Some(started) = record.start_timestamp {
                    let days_in_progress = (now - started).num_days();
                    let expected = task.effort.duration_days();
                    if days_in_progress > expected {
                        let dependents = successors
                            .get(&task.id)
                            .map(|s| s.len())
                            .unwrap_or(0);
                        bottlenecks.push(Bottleneck {
                            task_id: task.id.clone(),
                            task_name: task.name.clone(),
                            kind: BottleneckKind::DelayedCriticalTask,
                            status: record.status,
                            blocked_task_count: dependents,
                            impact: ImpactLevel::Critical,
                            notes: format!(
                                "critical path task taking longer than expected ({days_in_progress} days vs. {expected} expected)"
                            ),
                        });
                    }
                }
            }
        }

        bottlenecks.sort_by_key(|b| (Reverse(b.impact), b.task_id.clone()));
        info!(count = bottlenecks.len(), "bottleneck scan complete");
        bottlenecks
    }

    // ========================================================================
    // Timeline adherence
    // ========================================================================

    /// Compare planned phase windows against actual task timestamps.
    pub fn timeline_adherence(&self, now: DateTime<Utc>) -> TimelineAnalysis {
        let timeline = match &self.plan().schedule.timeline {
            Some(t) => t,
            None => {
                return TimelineAnalysis {
                    status: ScheduleStatus::Unknown,
                    overall_variance_days: 0,
                    is_on_schedule: false,
                    days_elapsed: 0,
                    current_expected_phase: None,
                    current_actual_phase: None,
                    phases_analysis: Vec::new(),
                }
            }
        };

        let start_date = timeline.estimated_start;
        let days_elapsed = (now - start_date).num_days().max(0);

        let mut phases_analysis = Vec::new();
        let mut overall_delay = 0;

        for window in &timeline.phases {
            let members: Vec<&TaskId> = self
                .plan()
                .schedule
                .phases
                .iter()
                .find(|g| g.phase == window.phase)
                .map(|g| g.tasks.iter().collect())
                .unwrap_or_default();

            let phase_completed = !members.is_empty()
                && members.iter().all(|id| {
                    self.records()
                        .get(*id)
                        .map(|r| r.status == TaskStatus::Completed)
                        .unwrap_or(false)
                });
            let phase_in_progress = members.iter().any(|id| {
                self.records()
                    .get(*id)
                    .map(|r| r.status == TaskStatus::InProgress)
                    .unwrap_or(false)
            });

            let actual_start = members
                .iter()
                .filter_map(|id| self.records().get(*id).and_then(|r| r.start_timestamp))
                .min();
            let actual_end = members
                .iter()
                .filter_map(|id| self.records().get(*id).and_then(|r| r.completion_timestamp))
                .max();

            let start_variance = actual_start
                .map(|actual| (actual - (start_date + Duration::days(window.start_day))).num_days());
            let end_variance = actual_end
                .map(|actual| (actual - (start_date + Duration::days(window.end_day))).num_days());

            let status = if phase_completed {
                match end_variance {
                    Some(v) if v > 0 => PhaseTimingStatus::CompletedLate,
                    Some(v) if v < 0 => PhaseTimingStatus::CompletedEarly,
                    Some(_) => PhaseTimingStatus::CompletedOnTime,
                    None => PhaseTimingStatus::Completed,
                }
            } else if phase_in_progress {
                if days_elapsed > window.end_day {
                    PhaseTimingStatus::Delayed
                } else if days_elapsed >= window.start_day {
                    PhaseTimingStatus::InProgress
                } else {
                    PhaseTimingStatus::Ahead
                }
            } else if days_elapsed > window.start_day {
                PhaseTimingStatus::Delayed
            } else {
                PhaseTimingStatus::Pending
            };

            if days_elapsed >= window.start_day
                && matches!(
                    status,
                    PhaseTimingStatus::Delayed | PhaseTimingStatus::CompletedLate
                )
            {
                let running_over = if phase_completed {
                    0
                } else {
                    days_elapsed - window.end_day
                };
                let variance = end_variance.unwrap_or(0).max(running_over);
                overall_delay = overall_delay.max(variance);
            }

            phases_analysis.push(PhaseVariance {
                phase: window.phase,
                status,
                planned_start_day: window.start_day,
                planned_end_day: window.end_day,
                actual_start_day: actual_start.map(|a| (a - start_date).num_days()),
                actual_end_day: actual_end.map(|a| (a - start_date).num_days()),
                start_variance_days: start_variance,
                end_variance_days: end_variance,
            });
        }

        let current_expected_phase = timeline
            .phases
            .iter()
            .rev()
            .find(|w| days_elapsed >= w.start_day)
            .map(|w| w.phase);

        let current_actual_phase = phases_analysis
            .iter()
            .find(|p| {
                matches!(
                    p.status,
                    PhaseTimingStatus::InProgress | PhaseTimingStatus::Delayed
                )
            })
            .map(|p| p.phase)
            .or_else(|| {
                phases_analysis
                    .iter()
                    .filter(|p| p.status.is_completed())
                    .map(|p| p.phase)
                    .max()
            });

        let is_on_schedule = overall_delay <= 0;
        let actual_rank = current_actual_phase.unwrap_or(0);
        let (is_ahead, is_behind) = match current_expected_phase {
            Some(expected) => (actual_rank > expected, actual_rank < expected),
            None => (false, overall_delay > 0),
        };

        let status = if is_ahead {
            ScheduleStatus::Ahead
        } else if is_behind {
            ScheduleStatus::Behind
        } else if is_on_schedule {
            ScheduleStatus::OnSchedule
        } else {
            ScheduleStatus::Unknown
        };

        debug!(?status, overall_delay, days_elapsed, "timeline adherence computed");

        TimelineAnalysis {
            status,
            overall_variance_days: overall_delay,
            is_on_schedule,
            days_elapsed,
            current_expected_phase,
            current_actual_phase,
            phases_analysis,
        }
    }

    // ========================================================================
    // At-risk classification
    // ========================================================================

    /// Classify every non-terminal task by accumulated risk factors.
    pub fn at_risk_tasks(&self, now: DateTime<Utc>) -> Vec<AtRiskTask> {
        let timeline_analysis = self.timeline_adherence(now);
        let is_behind = timeline_analysis.status == ScheduleStatus::Behind;
        let overall_variance = timeline_analysis.overall_variance_days;
        let warning_days = self.config().overdue_warning_days;

        let mut at_risk = Vec::new();

        for task in self.tasks().values() {
            let record = match self.records().get(&task.id) {
                Some(r) => r,
                None => continue,
            };
            if record.status.is_terminal() {
                continue;
            }

            let mut factors = Vec::new();
            let mut level = RiskLevel::None;
            let raise = |factors: &mut Vec<RiskFactor>, level: &mut RiskLevel, factor, at_least| {
                factors.push(factor);
                *level = (*level).max(at_least);
            };

            let is_critical = self.plan().schedule.is_critical(&task.id);
            if is_critical {
                raise(&mut factors, &mut level, RiskFactor::CriticalPathTask, RiskLevel::Medium);
            }

            if let Some(window) = self
                .plan()
                .schedule
                .phase_of(&task.id)
                .and_then(|phase| {
                    self.plan()
                        .schedule
                        .timeline
                        .as_ref()
                        .and_then(|t| t.window(phase))
                })
            {
                let days_remaining = window.end_day - timeline_analysis.days_elapsed;
                if days_remaining <= 0 && record.status == TaskStatus::Pending {
                    raise(&mut factors, &mut level, RiskFactor::OverdueNotStarted, RiskLevel::High);
                } else if days_remaining <= 0 && record.status == TaskStatus::InProgress {
                    raise(&mut factors, &mut level, RiskFactor::OverdueInProgress, RiskLevel::Medium);
                } else if days_remaining <= warning_days {
                    let at_least = if record.status == TaskStatus::Pending {
                        RiskLevel::High
                    } else {
                        RiskLevel::Medium
                    };
                    raise(&mut factors, &mut level, RiskFactor::ApproachingDeadline, at_least);
                }

                if task.effort == Effort::High && days_remaining <= 3 {
                    raise(
                        &mut factors,
                        &mut level,
                        RiskFactor::HighEffortShortTimeline,
                        RiskLevel::High,
                    );
                }
            }

            let mut blocked_by = Vec::new();
            for pred in task.predecessors() {
                let pred_status = self
                    .records()
                    .get(pred)
                    .map(|r| r.status)
                    .unwrap_or(TaskStatus::Pending);
                if pred_status != TaskStatus::Completed {
                    blocked_by.push(pred.clone());
                    if pred_status == TaskStatus::Blocked {
                        raise(&mut factors, &mut level, RiskFactor::BlockedDependency, RiskLevel::High);
                    } else if pred_status == TaskStatus::Failed {
                        raise(
                            &mut factors,
                            &mut level,
                            RiskFactor::FailedDependency,
                            RiskLevel::Critical,
                        );
                    }
                }
            }
            if !blocked_by.is_empty() && record.status != TaskStatus::Blocked {
                raise(
                    &mut factors,
                    &mut level,
                    RiskFactor::WaitingOnDependencies,
                    RiskLevel::Medium,
                );
            }

            if record.status == TaskStatus::Blocked {
                raise(
                    &mut factors,
                    &mut level,
                    RiskFactor::ExplicitlyBlocked,
                    RiskLevel::Critical,
                );
            }

            if is_behind && overall_variance > 0 && is_critical {
                raise(
                    &mut factors,
                    &mut level,
                    RiskFactor::ProjectBehindSchedule,
                    RiskLevel::High,
                );
            }

            if level != RiskLevel::None {
                at_risk.push(AtRiskTask {
                    task_id: task.id.clone(),
                    task_name: task.name.clone(),
                    current_status: record.status,
                    risk_level: level,
                    risk_factors: factors,
                    milestone: task.milestone.clone(),
                    is_critical_path: is_critical,
                    blocked_by,
                });
            }
        }

        at_risk.sort_by_key(|t| {
            (
                Reverse(t.risk_level),
                Reverse(t.is_critical_path),
                t.task_id.clone(),
            )
        });
        info!(count = at_risk.len(), "at-risk scan complete");
        at_risk
    }

    // ========================================================================
    // Progress report
    // ========================================================================

    /// Assemble the full structured progress report.
    pub fn progress_report(&self, now: DateTime<Utc>) -> ProgressReport {
        let progress = self.project_progress();
        let bottlenecks = self.bottlenecks(now);
        let timeline_analysis = self.timeline_adherence(now);
        let at_risk = self.at_risk_tasks(now);

        let high_risk_count = at_risk
            .iter()
            .filter(|t| t.risk_level >= RiskLevel::High)
            .count();
        let critical_bottlenecks = bottlenecks
            .iter()
            .filter(|b| b.impact == ImpactLevel::Critical)
            .count();
        let behind = timeline_analysis.status == ScheduleStatus::Behind;
        let variance = timeline_analysis.overall_variance_days;

        let project_health = if progress.overall_status == OverallStatus::Completed {
            ProjectHealth::Completed
        } else if high_risk_count > 2 || critical_bottlenecks > 0 || (behind && variance > 5) {
            ProjectHealth::AtRisk
        } else if high_risk_count > 0 || behind {
            ProjectHealth::NeedsAttention
        } else {
            ProjectHealth::OnTrack
        };

        let mut recent_activity: Vec<RecentUpdate> = self
            .tasks()
            .values()
            .flat_map(|task| {
                let records = self.records();
                records
                    .get(&task.id)
                    .map(|r| r.updates.clone())
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|u| (now - u.timestamp).num_days() <= 3)
                    .map(|u| RecentUpdate {
                        task_id: task.id.clone(),
                        task_name: task.name.clone(),
                        timestamp: u.timestamp,
                        status: u.status,
                        completion_percentage: u.completion_percentage,
                        notes: u.notes,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        recent_activity.sort_by_key(|u| Reverse(u.timestamp));
        recent_activity.truncate(10);

        let recommendations = self.recommendations(&bottlenecks, &at_risk, &timeline_analysis);

        ProgressReport {
            report_id: format!("progress_report_{}", now.format("%Y%m%d_%H%M%S")),
            timestamp: now,
            project_health,
            executive_summary: ExecutiveSummary {
                completion_percentage: progress.completion_percentage,
                status: progress.overall_status,
                timeline_status: timeline_analysis.status,
                variance_days: variance,
                critical_path_status: progress
                    .critical_path_progress
                    .as_ref()
                    .map(|c| c.critical_status),
                high_risk_tasks: high_risk_count,
                blocked_tasks: progress.task_summary.blocked,
            },
            milestone_summary: progress.milestone_progress.clone(),
            recent_activity,
            bottlenecks: bottlenecks.into_iter().take(5).collect(),
            at_risk_tasks: at_risk.into_iter().take(5).collect(),
            timeline_analysis,
            task_statistics: progress.task_summary,
            recommendations,
        }
    }

    /// Deterministic advisory strings derived from the analytics.
    fn recommendations(
        &self,
        bottlenecks: &[Bottleneck],
        at_risk: &[AtRiskTask],
        timeline: &TimelineAnalysis,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        let critical_bottlenecks: Vec<&Bottleneck> = bottlenecks
            .iter()
            .filter(|b| b.impact == ImpactLevel::Critical)
            .collect();
        if let Some(first) = critical_bottlenecks.first() {
            recommendations.push(format!(
                "Address {} critical bottleneck(s) immediately, starting with task '{}'",
                critical_bottlenecks.len(),
                first.task_name
            ));
        }

        let critical_risks: Vec<&AtRiskTask> = at_risk
            .iter()
            .filter(|t| t.risk_level == RiskLevel::Critical)
            .collect();
        if let Some(first) = critical_risks.first() {
            recommendations.push(format!(
                "Prioritize {} critical-risk task(s), especially '{}'",
                critical_risks.len(),
                first.task_name
            ));
        }

        let variance = timeline.overall_variance_days;
        if timeline.status == ScheduleStatus::Behind && variance > 5 {
            recommendations.push(format!(
                "Consider adjusting project timeline to account for {variance} day(s) delay"
            ));
        } else if timeline.status == ScheduleStatus::Behind && variance > 0 {
            recommendations.push(format!(
                "Implement recovery plan to address {variance} day(s) delay"
            ));
        }

        let blocked_count = at_risk
            .iter()
            .filter(|t| t.risk_factors.contains(&RiskFactor::ExplicitlyBlocked))
            .count();
        if blocked_count > 0 {
            recommendations.push(format!(
                "Remove blockers for {blocked_count} task(s) to restore project flow"
            ));
        }

        if at_risk.iter().any(|t| {
            t.risk_factors.contains(&RiskFactor::BlockedDependency)
                || t.risk_factors.contains(&RiskFactor::WaitingOnDependencies)
        }) {
            recommendations
                .push("Review task dependencies to optimize parallel work opportunities".into());
        }

        if recommendations.is_empty() {
            recommendations.push(match timeline.status {
                ScheduleStatus::OnSchedule => {
                    "Continue current progress to maintain on-time delivery".into()
                }
                ScheduleStatus::Ahead => {
                    "Consider reallocating resources to optimize project efficiency".into()
                }
                _ => "Conduct detailed review of project status to identify improvement opportunities"
                    .into(),
            });
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::build_execution_plan;
    use crate::plan::models::{AgentType, Task};
    use crate::schedule::build_schedule;
    use crate::CoordinatorConfig;
    use std::collections::{BTreeMap, BTreeSet};
    use uuid::Uuid;

    fn task(id: &str, effort: Effort, deps: &[&str]) -> Task {
        Task {
            id: TaskId::from(id),
            name: format!("Task {id}"),
            milestone: "M".into(),
            milestone_index: 0,
            effort,
            description: String::new(),
            declared_predecessors: deps.iter().map(|d| TaskId::from(*d)).collect(),
            inferred_predecessors: BTreeSet::new(),
            skill_requirements: [(AgentType::FullStackDeveloper, 0.8)].into_iter().collect(),
        }
    }

    fn tracker_for(tasks: Vec<Task>) -> ProgressTracker {
        let map: BTreeMap<TaskId, Task> =
            tasks.into_iter().map(|t| (t.id.clone(), t)).collect();
        let schedule = build_schedule(&map).unwrap();
        let plan = build_execution_plan(&map, schedule, &CoordinatorConfig::default());
        ProgressTracker::new(Uuid::new_v4(), map, vec!["M".into()], plan, CoordinatorConfig::default())
    }

    // ========================================================================
    // Bottlenecks
    // ========================================================================

    #[test]
    fn test_blocked_task_is_a_bottleneck() {
        let mut tracker = tracker_for(vec![
            task("a", Effort::Medium, &[]),
            task("b", Effort::Medium, &["a"]),
            task("c", Effort::Medium, &["b"]),
            task("d", Effort::Medium, &["b"]),
            task("e", Effort::Medium, &["c"]),
        ]);
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::Blocked, None, Some("waiting on vendor".into()), now)
            .unwrap();

        let bottlenecks = tracker.bottlenecks(now);
        let blocked = bottlenecks
            .iter()
            .find(|b| b.kind == BottleneckKind::ExplicitlyBlocked)
            .unwrap();
        assert_eq!(blocked.task_id, TaskId::from("a"));
        // a transitively blocks b, c, d, e.
        assert_eq!(blocked.blocked_task_count, 4);
        assert_eq!(blocked.impact, ImpactLevel::High);
        assert_eq!(blocked.notes, "waiting on vendor");
    }

    #[test]
    fn test_blocked_with_few_successors_is_medium() {
        let mut tracker = tracker_for(vec![
            task("a", Effort::Medium, &[]),
            task("b", Effort::Medium, &["a"]),
        ]);
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::Blocked, None, None, now)
            .unwrap();

        let bottlenecks = tracker.bottlenecks(now);
        assert_eq!(bottlenecks[0].impact, ImpactLevel::Medium);
        assert_eq!(bottlenecks[0].notes, "no details available");
    }

    #[test]
    fn test_delayed_critical_task_is_critical_impact() {
        let mut tracker = tracker_for(vec![
            task("a", Effort::Low, &[]),
            task("b", Effort::Low, &["a"]),
        ]);
        let start = Utc::now() - Duration::days(5);
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, start)
            .unwrap();

        let bottlenecks = tracker.bottlenecks(Utc::now());
        let delayed = bottlenecks
            .iter()
            .find(|b| b.kind == BottleneckKind::DelayedCriticalTask)
            .unwrap();
        assert_eq!(delayed.impact, ImpactLevel::Critical);
        assert!(delayed.notes.contains("5 days vs. 1 expected"));
    }

    #[test]
    fn test_bottlenecks_sorted_by_impact() {
        let mut tracker = tracker_for(vec![
            task("a", Effort::Low, &[]),
            task("b", Effort::Low, &["a"]),
            task("z", Effort::Low, &[]),
        ]);
        let now = Utc::now();
        // z blocked (medium); a delayed critical (critical impact).
        tracker
            .update_status(&TaskId::from("z"), TaskStatus::Blocked, None, None, now)
            .unwrap();
        tracker
            .update_status(
                &TaskId::from("a"),
                TaskStatus::InProgress,
                None,
                None,
                now - Duration::days(4),
            )
            .unwrap();

        let bottlenecks = tracker.bottlenecks(now);
        assert!(bottlenecks.len() >= 2);
        assert_eq!(bottlenecks[0].kind, BottleneckKind::DelayedCriticalTask);
    }

    // ========================================================================
    // Timeline adherence
    // ========================================================================

    #[test]
    fn test_fresh_project_has_no_variance() {
        let tracker = tracker_for(vec![
            task("a", Effort::Medium, &[]),
            task("b", Effort::Medium, &["a"]),
        ]);
        let analysis = tracker.timeline_adherence(Utc::now());
        assert_eq!(analysis.overall_variance_days, 0);
        assert_eq!(analysis.days_elapsed, 0);
        assert!(analysis.is_on_schedule);
    }

    #[test]
    fn test_unstarted_phase_past_start_is_delayed() {
        let tracker = tracker_for(vec![
            task("a", Effort::Medium, &[]),
            task("b", Effort::Medium, &["a"]),
        ]);
        // Five days in, nothing has started: phase 1 (0..2) is delayed.
        let analysis = tracker.timeline_adherence(Utc::now() + Duration::days(5));
        assert_eq!(analysis.days_elapsed, 5);
        assert_eq!(analysis.phases_analysis[0].status, PhaseTimingStatus::Delayed);
        assert!(analysis.overall_variance_days > 0);
        assert_eq!(analysis.status, ScheduleStatus::Behind);
    }

    #[test]
    fn test_completed_phase_records_variance() {
        let mut tracker = tracker_for(vec![
            task("a", Effort::Medium, &[]),
            task("b", Effort::Medium, &["a"]),
        ]);
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        tracker.complete_task(&TaskId::from("a"), None, now).unwrap();

        let analysis = tracker.timeline_adherence(now);
        let phase1 = &analysis.phases_analysis[0];
        assert!(phase1.status.is_completed());
        assert_eq!(phase1.actual_end_day, Some(0));
        // Planned end day 2, finished on day 0.
        assert_eq!(phase1.end_variance_days, Some(-1));
        assert_eq!(phase1.status, PhaseTimingStatus::CompletedEarly);
    }

    // ========================================================================
    // At-risk classification
    // ========================================================================

    #[test]
    fn test_blocked_task_is_critical_risk() {
        let mut tracker = tracker_for(vec![
            task("a", Effort::Medium, &[]),
            task("b", Effort::Medium, &["a"]),
        ]);
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::Blocked, None, None, now)
            .unwrap();

        let at_risk = tracker.at_risk_tasks(now);
        let a = at_risk.iter().find(|t| t.task_id == TaskId::from("a")).unwrap();
        assert_eq!(a.risk_level, RiskLevel::Critical);
        assert!(a.risk_factors.contains(&RiskFactor::ExplicitlyBlocked));

        // b inherits HIGH risk through its blocked dependency.
        let b = at_risk.iter().find(|t| t.task_id == TaskId::from("b")).unwrap();
        assert!(b.risk_level >= RiskLevel::High);
        assert!(b.risk_factors.contains(&RiskFactor::BlockedDependency));
        assert_eq!(b.blocked_by, vec![TaskId::from("a")]);
    }

    #[test]
    fn test_failed_dependency_is_critical() {
        let mut tracker = tracker_for(vec![
            task("a", Effort::Medium, &[]),
            task("b", Effort::Medium, &["a"]),
        ]);
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::Failed, None, None, now)
            .unwrap();

        let at_risk = tracker.at_risk_tasks(now);
        let b = at_risk.iter().find(|t| t.task_id == TaskId::from("b")).unwrap();
        assert_eq!(b.risk_level, RiskLevel::Critical);
        assert!(b.risk_factors.contains(&RiskFactor::FailedDependency));
    }

    #[test]
    fn test_terminal_tasks_are_not_classified() {
        let mut tracker = tracker_for(vec![task("a", Effort::Medium, &[])]);
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        tracker.complete_task(&TaskId::from("a"), None, now).unwrap();

        let at_risk = tracker.at_risk_tasks(now);
        assert!(at_risk.iter().all(|t| t.task_id != TaskId::from("a")));
    }

    #[test]
    fn test_overdue_pending_task_is_high_risk() {
        let tracker = tracker_for(vec![task("a", Effort::Low, &[])]);
        // Ten days in, the single one-day phase is long over and the task
        // never started.
        let at_risk = tracker.at_risk_tasks(Utc::now() + Duration::days(10));
        let a = at_risk.iter().find(|t| t.task_id == TaskId::from("a")).unwrap();
        assert!(a.risk_factors.contains(&RiskFactor::OverdueNotStarted));
        assert!(a.risk_level >= RiskLevel::High);
    }

    #[test]
    fn test_sorted_by_risk_then_critical() {
        let mut tracker = tracker_for(vec![
            task("a", Effort::Medium, &[]),
            task("b", Effort::Medium, &["a"]),
            task("c", Effort::Medium, &["a"]),
        ]);
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::Blocked, None, None, now)
            .unwrap();

        let at_risk = tracker.at_risk_tasks(now);
        for pair in at_risk.windows(2) {
            assert!(pair[0].risk_level >= pair[1].risk_level);
        }
        assert_eq!(at_risk[0].task_id, TaskId::from("a"));
    }

    // ========================================================================
    // Progress report
    // ========================================================================

    #[test]
    fn test_report_health_on_track_when_quiet() {
        let mut tracker = tracker_for(vec![
            task("a", Effort::Medium, &[]),
            task("b", Effort::Medium, &["a"]),
        ]);
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, Some(30.0), None, now)
            .unwrap();

        let report = tracker.progress_report(now);
        assert_eq!(report.project_health, ProjectHealth::OnTrack);
        assert_eq!(report.executive_summary.blocked_tasks, 0);
        assert!(!report.recent_activity.is_empty());
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn test_report_flags_critical_bottleneck() {
        let mut tracker = tracker_for(vec![
            task("a", Effort::Low, &[]),
            task("b", Effort::Low, &["a"]),
        ]);
        let now = Utc::now();
        tracker
            .update_status(
                &TaskId::from("a"),
                TaskStatus::InProgress,
                None,
                None,
                now - Duration::days(6),
            )
            .unwrap();

        let report = tracker.progress_report(now);
        assert_eq!(report.project_health, ProjectHealth::AtRisk);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("critical bottleneck")));
    }

    #[test]
    fn test_report_completed_health() {
        let mut tracker = tracker_for(vec![task("a", Effort::Low, &[])]);
        let now = Utc::now();
        tracker
            .update_status(&TaskId::from("a"), TaskStatus::InProgress, None, None, now)
            .unwrap();
        tracker.complete_task(&TaskId::from("a"), None, now).unwrap();

        let report = tracker.progress_report(now);
        assert_eq!(report.project_health, ProjectHealth::Completed);
    }

    #[test]
    fn test_report_caps_lists() {
        let mut specs = Vec::new();
        for i in 0..12 {
            specs.push(task(&format!("t{i:02}"), Effort::Low, &[]));
        }
        let mut tracker = tracker_for(specs);
        let now = Utc::now();
        for i in 0..12 {
            tracker
                .update_status(
                    &TaskId::from(format!("t{i:02}").as_str()),
                    TaskStatus::InProgress,
                    Some(10.0),
                    None,
                    now,
                )
                .unwrap();
        }

        let report = tracker.progress_report(now);
        assert!(report.recent_activity.len() <= 10);
        assert!(report.bottlenecks.len() <= 5);
        assert!(report.at_risk_tasks.len() <= 5);
    }
}
