//! Critical Path Method over the task DAG.
//!
//! Forward pass assigns earliest times in topological order, backward
//! pass assigns latest times in reverse order, and zero-slack tasks form
//! the critical path. Phases bucket tasks by earliest start.

use super::models::{PhaseGroup, Priority, Schedule, TaskNode};
use crate::error::Result;
use crate::plan::builder::topological_order;
use crate::plan::models::{Effort, Task, TaskId};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Build the full CPM schedule for a task set.
///
/// Returns `CircularDependency` if the graph is not a DAG; callers are
/// expected to re-run ingestion after removing an edge.
pub fn build_schedule(tasks: &BTreeMap<TaskId, Task>) -> Result<Schedule> {
    let order = topological_order(tasks)?;

    // Forward pass: ES(v) = max EF over predecessors, EF = ES + duration.
    let mut earliest: BTreeMap<TaskId, (i64, i64)> = BTreeMap::new();
    for id in &order {
        let task = &tasks[id];
        let es = task
            .predecessors()
            .filter_map(|p| earliest.get(p).map(|(_, ef)| *ef))
            .max()
            .unwrap_or(0);
        let ef = es + task.effort.duration_days();
        earliest.insert(id.clone(), (es, ef));
    }

    let project_end = earliest.values().map(|(_, ef)| *ef).max().unwrap_or(0);

    // Successor adjacency for the backward pass.
    let mut successors: BTreeMap<&TaskId, Vec<&TaskId>> =
        tasks.keys().map(|id| (id, Vec::new())).collect();
    let mut edges = Vec::new();
    for task in tasks.values() {
        for pred in task.predecessors() {
            if let Some(succs) = successors.get_mut(pred) {
                succs.push(&task.id);
            }
            edges.push((pred.clone(), task.id.clone()));
        }
    }
    edges.sort();

    // Backward pass: LF(v) = min LS over successors (or project end),
    // LS = LF - duration.
    let mut latest: BTreeMap<TaskId, (i64, i64)> = BTreeMap::new();
    for id in order.iter().rev() {
        let task = &tasks[id];
        let lf = successors
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|s| latest.get(*s).map(|(ls, _)| *ls))
            .min()
            .unwrap_or(project_end);
        let ls = lf - task.effort.duration_days();
        latest.insert(id.clone(), (ls, lf));
    }

    // Critical path: zero slack, ascending earliest start, ties by id.
    let mut critical_path: Vec<TaskId> = tasks
        .keys()
        .filter(|id| latest[*id].0 == earliest[*id].0)
        .cloned()
        .collect();
    critical_path.sort_by_key(|id| (earliest[id].0, id.clone()));
    let critical: BTreeSet<&TaskId> = critical_path.iter().collect();

    // Direct predecessors of critical tasks get a priority boost.
    let mut feeds_critical: BTreeSet<&TaskId> = BTreeSet::new();
    for id in &critical_path {
        for pred in tasks[id].predecessors() {
            feeds_critical.insert(pred);
        }
    }

    let mut nodes = BTreeMap::new();
    for (id, task) in tasks {
        let (es, ef) = earliest[id];
        let (ls, lf) = latest[id];
        let is_critical = critical.contains(id);
        let priority = assign_priority(task, is_critical, feeds_critical.contains(id), ls - es);
        nodes.insert(
            id.clone(),
            TaskNode {
                id: id.clone(),
                earliest_start: es,
                earliest_finish: ef,
                latest_start: ls,
                latest_finish: lf,
                is_critical,
                priority,
            },
        );
    }

    let phases = group_phases(&nodes);
    debug!(
        phases = phases.len(),
        critical = critical_path.len(),
        "cpm passes complete"
    );
    info!(
        tasks = nodes.len(),
        project_end, "schedule built"
    );

    Ok(Schedule {
        nodes,
        edges,
        critical_path,
        phases,
        checkpoints: Vec::new(),
        timeline: None,
    })
}

/// Priority rules applied after the CPM passes.
fn assign_priority(task: &Task, is_critical: bool, feeds_critical: bool, slack: i64) -> Priority {
    if is_critical {
        Priority::Critical
    } else if feeds_critical || task.effort == Effort::High {
        Priority::High
    } else if slack > 3 {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// Bucket nodes by earliest start into ordered parallel phases.
fn group_phases(nodes: &BTreeMap<TaskId, TaskNode>) -> Vec<PhaseGroup> {
    let mut buckets: BTreeMap<i64, Vec<TaskId>> = BTreeMap::new();
    for node in nodes.values() {
        buckets
            .entry(node.earliest_start)
            .or_default()
            .push(node.id.clone());
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(idx, (start, mut tasks))| {
            tasks.sort_by_key(|id| (Reverse(nodes[id].priority), id.clone()));
            PhaseGroup {
                phase: idx + 1,
                start,
                tasks,
            }
        })
        .collect()
}
