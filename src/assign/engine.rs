//! Turning a schedule into per-agent work queues.
//!
//! Skill matching picks the best-scoring agent per task with a fixed
//! tie-break order, workload balancing shuffles transferable (LOW and
//! MEDIUM priority) tasks until the spread closes, and checkpoints are
//! inserted after every N phases.

use super::models::{ExecutionPhase, ExecutionPlan, Instruction, PhaseTask, PlanValidation};
use crate::plan::models::{AgentType, Task, TaskId};
use crate::schedule::models::{Checkpoint, PhaseWindow, Priority, Schedule, Timeline};
use crate::CoordinatorConfig;
use chrono::{Duration, Utc};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Build the execution plan: assignments, balanced queues, phases,
/// checkpoints, timeline, and validation.
pub fn build_execution_plan(
    tasks: &BTreeMap<TaskId, Task>,
    mut schedule: Schedule,
    config: &CoordinatorConfig,
) -> ExecutionPlan {
    let mut owner = match_tasks_to_agents(tasks);
    balance_workload(&schedule, &mut owner, config.workload_imbalance_threshold);

    let assignments = build_queues(tasks, &schedule, &owner);
    let execution_phases = build_phases(&schedule, &owner);
    let timeline = estimate_timeline(tasks, &schedule);
    schedule.checkpoints = place_checkpoints(
        tasks,
        &schedule,
        &timeline,
        config.checkpoint_every_n_phases,
    );
    schedule.timeline = Some(timeline);

    let validation = validate(
        &schedule,
        &assignments,
        &execution_phases,
        &owner,
        config,
    );

    info!(
        agents = assignments.len(),
        phases = execution_phases.len(),
        checkpoints = schedule.checkpoints.len(),
        is_valid = validation.is_valid,
        "execution plan built"
    );

    ExecutionPlan {
        schedule,
        assignments,
        execution_phases,
        validation,
    }
}

/// Pick the best agent per task by skill score. Ties resolve in the
/// fixed `AgentType::ALL` order; a task with no usable score defaults to
/// the full-stack developer.
fn match_tasks_to_agents(tasks: &BTreeMap<TaskId, Task>) -> BTreeMap<TaskId, AgentType> {
    let mut owner = BTreeMap::new();
    for task in tasks.values() {
        let mut best = AgentType::FullStackDeveloper;
        let mut best_score = 0.0_f64;
        for agent in AgentType::ALL {
            let score = task.skill_requirements.get(&agent).copied().unwrap_or(0.0);
            if score > best_score {
                best = agent;
                best_score = score;
            }
        }
        owner.insert(task.id.clone(), best);
    }
    owner
}

/// Move transferable tasks from the most- to the least-loaded agent
/// until the spread is within the threshold.
///
/// Only LOW and MEDIUM priority tasks are transferable; among those the
/// lowest priority moves first, ties broken by latest earliest-start.
/// When no candidate exists the imbalance stands and is later reported
/// through validation issues.
fn balance_workload(
    schedule: &Schedule,
    owner: &mut BTreeMap<TaskId, AgentType>,
    threshold: usize,
) {
    loop {
        let counts = load_counts(owner);
        let (max_agent, max_count) = counts
            .iter()
            .max_by_key(|(agent, count)| (**count, Reverse(agent_rank(**agent))))
            .map(|(a, c)| (*a, *c))
            .unwrap_or((AgentType::FullStackDeveloper, 0));
        let (min_agent, min_count) = counts
            .iter()
            .min_by_key(|(agent, count)| (**count, agent_rank(**agent)))
            .map(|(a, c)| (*a, *c))
            .unwrap_or((AgentType::FullStackDeveloper, 0));

        if max_count.saturating_sub(min_count) <= threshold {
            break;
        }

        let mut transferable: Vec<&TaskId> = owner
            .iter()
            .filter(|(id, agent)| {
                **agent == max_agent
                    && matches!(
                        schedule.nodes[*id].priority,
                        Priority::Low | Priority::Medium
                    )
            })
            .map(|(id, _)| id)
            .collect();

        if transferable.is_empty() {
            debug!(agent = %max_agent, "no transferable tasks, leaving imbalance");
            break;
        }

        transferable.sort_by_key(|id| {
            let node = &schedule.nodes[*id];
            (node.priority, Reverse(node.earliest_start), (*id).clone())
        });
        let moved = transferable[0].clone();
        debug!(task = %moved, from = %max_agent, to = %min_agent, "rebalanced task");
        owner.insert(moved, min_agent);
    }
}

fn load_counts(owner: &BTreeMap<TaskId, AgentType>) -> BTreeMap<AgentType, usize> {
    let mut counts: BTreeMap<AgentType, usize> =
        AgentType::ALL.iter().map(|a| (*a, 0)).collect();
    for agent in owner.values() {
        *counts.entry(*agent).or_default() += 1;
    }
    counts
}

/// Position in the fixed tie-break order.
fn agent_rank(agent: AgentType) -> usize {
    AgentType::ALL
        .iter()
        .position(|a| *a == agent)
        .unwrap_or(AgentType::ALL.len())
}

/// Build each agent's ordered instruction queue.
fn build_queues(
    tasks: &BTreeMap<TaskId, Task>,
    schedule: &Schedule,
    owner: &BTreeMap<TaskId, AgentType>,
) -> BTreeMap<AgentType, Vec<Instruction>> {
    let mut assignments: BTreeMap<AgentType, Vec<Instruction>> =
        AgentType::ALL.iter().map(|a| (*a, Vec::new())).collect();

    for (id, agent) in owner {
        let task = &tasks[id];
        let node = &schedule.nodes[id];
        let predecessor_ownership: BTreeMap<TaskId, AgentType> = task
            .predecessors()
            .filter_map(|p| owner.get(p).map(|a| (p.clone(), *a)))
            .collect();

        let instruction = Instruction {
            task_id: id.clone(),
            name: task.name.clone(),
            description: task.description.clone(),
            milestone: task.milestone.clone(),
            milestone_index: task.milestone_index,
            effort: task.effort,
            priority: node.priority,
            earliest_start: node.earliest_start,
            latest_start: node.latest_start,
            is_critical: node.is_critical,
            is_blocked: !predecessor_ownership.is_empty(),
            predecessor_ownership,
        };
        if let Some(queue) = assignments.get_mut(agent) {
            queue.push(instruction);
        }
    }

    for queue in assignments.values_mut() {
        queue.sort_by_key(|i| (Reverse(i.priority), i.earliest_start, i.task_id.clone()));
    }
    assignments
}

/// Project the schedule's parallel phases into agent-annotated phases.
fn build_phases(
    schedule: &Schedule,
    owner: &BTreeMap<TaskId, AgentType>,
) -> Vec<ExecutionPhase> {
    schedule
        .phases
        .iter()
        .map(|group| ExecutionPhase {
            phase: group.phase,
            tasks: group
                .tasks
                .iter()
                .filter_map(|id| {
                    let node = schedule.nodes.get(id)?;
                    let agent = owner.get(id)?;
                    Some(PhaseTask {
                        task_id: id.clone(),
                        agent: *agent,
                        priority: node.priority,
                        is_critical: node.is_critical,
                    })
                })
                .collect(),
        })
        .collect()
}

/// Phase duration is the longest task in the phase; phases run back to
/// back, so the total is their sum.
fn estimate_timeline(tasks: &BTreeMap<TaskId, Task>, schedule: &Schedule) -> Timeline {
    let mut windows = Vec::with_capacity(schedule.phases.len());
    let mut cumulative = 0;

    for group in &schedule.phases {
        let duration = group
            .tasks
            .iter()
            .filter_map(|id| tasks.get(id).map(|t| t.effort.duration_days()))
            .max()
            .unwrap_or(0);
        windows.push(PhaseWindow {
            phase: group.phase,
            start_day: cumulative,
            end_day: cumulative + duration,
            duration_days: duration,
        });
        cumulative += duration;
    }

    let estimated_start = Utc::now();
    Timeline {
        phases: windows,
        total_duration_days: cumulative,
        estimated_start,
        estimated_end: estimated_start + Duration::days(cumulative),
    }
}

/// Insert a checkpoint after every Nth phase. The milestone reached is
/// the highest milestone index among tasks whose earliest start falls at
/// or before the phase index.
fn place_checkpoints(
    tasks: &BTreeMap<TaskId, Task>,
    schedule: &Schedule,
    timeline: &Timeline,
    every_n: usize,
) -> Vec<Checkpoint> {
    if every_n == 0 || schedule.phases.is_empty() {
        return Vec::new();
    }

    let mut checkpoints = Vec::new();
    let mut after_phase = every_n;
    while after_phase <= schedule.phases.len() {
        let milestone_reached = milestone_at_phase(tasks, schedule, after_phase);
        let day = timeline
            .window(after_phase)
            .map(|w| w.end_day)
            .unwrap_or(timeline.total_duration_days);
        checkpoints.push(Checkpoint {
            checkpoint_id: format!("checkpoint_{}", checkpoints.len() + 1),
            after_phase,
            milestone_reached,
            day,
        });
        after_phase += every_n;
    }
    checkpoints
}

/// Name of the milestone with the highest index among tasks whose
/// earliest start is at or before `phase_index`.
fn milestone_at_phase(
    tasks: &BTreeMap<TaskId, Task>,
    schedule: &Schedule,
    phase_index: usize,
) -> Option<String> {
    schedule
        .nodes
        .values()
        .filter(|node| node.earliest_start <= phase_index as i64)
        .filter_map(|node| tasks.get(&node.id))
        .max_by_key(|task| task.milestone_index)
        .map(|task| task.milestone.clone())
}

/// Validate the finished plan. Issues never withhold the plan; callers
/// inspect `PlanValidation` and decide.
fn validate(
    schedule: &Schedule,
    assignments: &BTreeMap<AgentType, Vec<Instruction>>,
    execution_phases: &[ExecutionPhase],
    owner: &BTreeMap<TaskId, AgentType>,
    config: &CoordinatorConfig,
) -> PlanValidation {
    let mut issues = Vec::new();
    let mut is_valid = true;

    for id in &schedule.critical_path {
        if !owner.contains_key(id) {
            is_valid = false;
            issues.push(format!("critical path task {id} is not assigned to any agent"));
        }
    }

    for phase in execution_phases {
        if phase.tasks.is_empty() {
            is_valid = false;
            issues.push(format!("phase {} has no tasks assigned", phase.phase));
        }
    }

    let total = schedule
        .timeline
        .as_ref()
        .map(|t| t.total_duration_days)
        .unwrap_or(0);
    if total <= 0 {
        is_valid = false;
        issues.push("timeline duration must be positive".into());
    }
    if total > config.max_project_duration_days {
        is_valid = false;
        issues.push(format!(
            "timeline duration of {total} days exceeds the configured maximum of {} days",
            config.max_project_duration_days
        ));
    }

    let counts: Vec<usize> = assignments.values().map(|q| q.len()).collect();
    if let (Some(max), Some(min)) = (counts.iter().max(), counts.iter().min()) {
        if max - min > config.workload_imbalance_threshold {
            issues.push(format!(
                "workload imbalance of {} tasks remains; no transferable tasks available",
                max - min
            ));
        }
    }

    if !is_valid {
        warn!(issues = issues.len(), "plan validation found issues");
    }

    PlanValidation {
        is_valid,
        issues,
        validated_at: Utc::now(),
    }
}
