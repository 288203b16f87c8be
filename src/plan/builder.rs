//! Plan ingestion: task normalization, dependency inference, skill
//! scoring, and acyclicity checking.
//!
//! All heuristics here are pure and deterministic so they can be
//! unit-tested and versioned: dependency inference is a fixed rule table
//! (shared name tokens or a recognized lifecycle pair), skill scoring is
//! a fixed keyword table.

use super::models::{AgentType, Effort, Plan, PlanAnalysis, Task, TaskId};
use crate::error::{CoordinatorError, Result};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Output of plan ingestion: the normalized task set plus metadata.
#[derive(Debug, Clone)]
pub struct IngestedPlan {
    /// Normalized tasks keyed by id
    pub tasks: BTreeMap<TaskId, Task>,
    /// Milestone names in plan order
    pub milestones: Vec<String>,
    /// Structural summary of the plan
    pub analysis: PlanAnalysis,
    /// Non-fatal issues observed during ingestion
    pub warnings: Vec<String>,
}

/// Ingest a plan: flatten milestones into tasks, infer cross-milestone
/// dependencies, compute skill requirements, and confirm acyclicity.
///
/// Fails with `InvalidPlan` on structural problems and with
/// `CircularDependency` if the resulting graph has a cycle.
pub fn ingest_plan(plan: &Plan) -> Result<IngestedPlan> {
    info!(plan = %plan.name, "ingesting project plan");

    if plan.milestones.is_empty() {
        return Err(CoordinatorError::InvalidPlan(
            "plan has no milestones".into(),
        ));
    }

    let mut milestone_names: BTreeSet<&str> = BTreeSet::new();
    for milestone in &plan.milestones {
        if !milestone_names.insert(&milestone.name) {
            return Err(CoordinatorError::InvalidPlan(format!(
                "duplicate milestone name '{}'",
                milestone.name
            )));
        }
    }

    let mut warnings = Vec::new();
    let mut tasks: BTreeMap<TaskId, Task> = BTreeMap::new();
    let mut order: Vec<TaskId> = Vec::new();
    let mut task_counts = BTreeMap::new();

    for (milestone_index, milestone) in plan.milestones.iter().enumerate() {
        if milestone.tasks.is_empty() {
            warnings.push(format!("milestone '{}' has no tasks", milestone.name));
        }
        task_counts.insert(milestone.name.clone(), milestone.tasks.len());

        for spec in &milestone.tasks {
            if spec.name.trim().is_empty() {
                return Err(CoordinatorError::InvalidPlan(format!(
                    "milestone '{}' contains a task with an empty name",
                    milestone.name
                )));
            }

            // Use the plan-provided id when unique, otherwise synthesize one.
            let id = match &spec.id {
                Some(raw) if !tasks.contains_key(&TaskId::from(raw.clone())) => {
                    TaskId::from(raw.clone())
                }
                provided => {
                    let synthesized = TaskId::from(format!("task_{}", tasks.len() + 1));
                    if provided.is_some() {
                        warnings.push(format!(
                            "duplicate task id '{}' replaced with '{}'",
                            provided.as_deref().unwrap_or_default(),
                            synthesized
                        ));
                    }
                    synthesized
                }
            };

            let task = Task {
                id: id.clone(),
                name: spec.name.clone(),
                milestone: milestone.name.clone(),
                milestone_index,
                effort: spec.effort,
                description: spec
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("Task from milestone: {}", milestone.name)),
                declared_predecessors: spec
                    .dependencies
                    .iter()
                    .map(|d| TaskId::from(d.clone()))
                    .collect(),
                inferred_predecessors: BTreeSet::new(),
                skill_requirements: compute_skill_requirements(&spec.name, spec.effort),
            };
            order.push(id.clone());
            tasks.insert(id, task);
        }
    }

    if tasks.is_empty() {
        return Err(CoordinatorError::InvalidPlan("plan has no tasks".into()));
    }

    // Every declared predecessor must resolve within the plan.
    for task in tasks.values() {
        for pred in &task.declared_predecessors {
            if !tasks.contains_key(pred) {
                return Err(CoordinatorError::InvalidPlan(format!(
                    "task '{}' declares unknown predecessor '{}'",
                    task.id, pred
                )));
            }
        }
    }

    infer_dependencies(&mut tasks);
    assert_acyclic(&tasks)?;

    let analysis = PlanAnalysis {
        total_milestones: plan.milestones.len(),
        total_tasks: tasks.len(),
        task_counts_by_milestone: task_counts,
        resource_types: plan.resource_pool.iter().map(|r| r.agent_type).collect(),
        analyzed_at: Utc::now(),
    };

    info!(
        tasks = tasks.len(),
        milestones = plan.milestones.len(),
        warnings = warnings.len(),
        "plan ingested"
    );

    Ok(IngestedPlan {
        tasks,
        milestones: plan.milestones.iter().map(|m| m.name.clone()).collect(),
        analysis,
        warnings,
    })
}

/// Add inferred cross-milestone predecessors to every task.
///
/// A task in milestone `i` gains every task from milestones `j < i` whose
/// name is logically related (see [`is_logical_dependency`]) and which is
/// not already a declared predecessor.
fn infer_dependencies(tasks: &mut BTreeMap<TaskId, Task>) {
    let snapshot: Vec<(TaskId, String, usize)> = tasks
        .values()
        .map(|t| (t.id.clone(), t.name.clone(), t.milestone_index))
        .collect();

    for task in tasks.values_mut() {
        if task.milestone_index == 0 {
            continue;
        }
        for (pred_id, pred_name, pred_milestone) in &snapshot {
            if *pred_milestone >= task.milestone_index {
                continue;
            }
            if task.declared_predecessors.contains(pred_id) {
                continue;
            }
            if is_logical_dependency(pred_name, &task.name) {
                debug!(predecessor = %pred_id, task = %task.id, "inferred dependency");
                task.inferred_predecessors.insert(pred_id.clone());
            }
        }
    }
}

/// Whether `successor_name` logically depends on `predecessor_name`.
///
/// True when the lowercase names share at least two tokens, or when a
/// recognized lifecycle pair is present (design→implement,
/// implement→test, create→use, setup→configure).
pub fn is_logical_dependency(predecessor_name: &str, successor_name: &str) -> bool {
    let pred = predecessor_name.to_lowercase();
    let succ = successor_name.to_lowercase();

    let pred_terms: BTreeSet<&str> = pred.split_whitespace().collect();
    let succ_terms: BTreeSet<&str> = succ.split_whitespace().collect();
    if pred_terms.intersection(&succ_terms).count() >= 2 {
        return true;
    }

    const LIFECYCLE_PAIRS: [(&str, &str); 4] = [
        ("design", "implement"),
        ("implement", "test"),
        ("create", "use"),
        ("setup", "configure"),
    ];
    LIFECYCLE_PAIRS
        .iter()
        .any(|(from, to)| pred.contains(from) && succ.contains(to))
}

/// Score the proficiency each agent type needs for a task.
///
/// Keyword classes map to 0.8 for the matching agent; HIGH effort adds
/// 0.2 (clamped at 1.0) to the top-scoring agent; if everything stays
/// below 0.5 the task defaults to full_stack_developer at 0.5.
pub fn compute_skill_requirements(task_name: &str, effort: Effort) -> BTreeMap<AgentType, f64> {
    const KEYWORD_CLASSES: [(AgentType, &[&str]); 4] = [
        (
            AgentType::SolutionArchitect,
            &["architect", "design", "system", "structure"],
        ),
        (
            AgentType::FullStackDeveloper,
            &["develop", "implement", "code", "build", "create"],
        ),
        (
            AgentType::QaTest,
            &["test", "qa", "quality", "validation", "verify"],
        ),
        (
            AgentType::ProjectManager,
            &["plan", "coordinate", "schedule", "manage"],
        ),
    ];

    let name = task_name.to_lowercase();
    let mut requirements: BTreeMap<AgentType, f64> =
        AgentType::ALL.iter().map(|a| (*a, 0.0)).collect();

    for (agent, keywords) in KEYWORD_CLASSES {
        if keywords.iter().any(|k| name.contains(k)) {
            requirements.insert(agent, 0.8);
        }
    }

    if effort == Effort::High {
        // Bump the top-scoring agent; ties resolve in the fixed ALL order.
        let top = AgentType::ALL
            .iter()
            .copied()
            .max_by(|a, b| {
                requirements[a]
                    .partial_cmp(&requirements[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(AgentType::FullStackDeveloper);
        let bumped = (requirements[&top] + 0.2).min(1.0);
        requirements.insert(top, bumped);
    }

    if requirements.values().all(|score| *score < 0.5) {
        requirements.insert(AgentType::FullStackDeveloper, 0.5);
    }

    requirements
}

/// Compute a deterministic topological order of the task graph.
///
/// Kahn's algorithm with a lexicographic tie-break on task id. Returns
/// `CircularDependency` with the offending cycle path when the graph is
/// not a DAG.
pub fn topological_order(tasks: &BTreeMap<TaskId, Task>) -> Result<Vec<TaskId>> {
    let mut indegree: BTreeMap<&TaskId, usize> = tasks.keys().map(|id| (id, 0)).collect();
    let mut successors: BTreeMap<&TaskId, Vec<&TaskId>> =
        tasks.keys().map(|id| (id, Vec::new())).collect();

    for task in tasks.values() {
        for pred in task.predecessors() {
            if tasks.contains_key(pred) {
                if let Some(deg) = indegree.get_mut(&task.id) {
                    *deg += 1;
                }
                if let Some(succs) = successors.get_mut(pred) {
                    succs.push(&task.id);
                }
            }
        }
    }

    let mut ready: BTreeSet<&TaskId> = indegree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut order = Vec::with_capacity(tasks.len());

    while let Some(id) = ready.iter().next().copied() {
        ready.remove(id);
        order.push(id.clone());
        for succ in successors.get(id).cloned().unwrap_or_default() {
            if let Some(deg) = indegree.get_mut(succ) {
                *deg -= 1;
                if *deg == 0 {
                    ready.insert(succ);
                }
            }
        }
    }

    if order.len() != tasks.len() {
        let remaining: BTreeSet<TaskId> = tasks
            .keys()
            .filter(|id| !order.contains(id))
            .cloned()
            .collect();
        let cycle = extract_cycle(&remaining, tasks);
        warn!(cycle = ?cycle, "task graph contains a cycle");
        return Err(CoordinatorError::CircularDependency(cycle));
    }

    Ok(order)
}

/// Confirm the task graph is a DAG.
pub fn assert_acyclic(tasks: &BTreeMap<TaskId, Task>) -> Result<()> {
    topological_order(tasks).map(|_| ())
}

/// Walk predecessor edges inside the unresolved node set until a node
/// repeats, producing a concrete cycle path (closed: first == last).
fn extract_cycle(remaining: &BTreeSet<TaskId>, tasks: &BTreeMap<TaskId, Task>) -> Vec<TaskId> {
    let start = match remaining.iter().next() {
        Some(id) => id.clone(),
        None => return Vec::new(),
    };

    let mut path = vec![start.clone()];
    let mut current = start;
    loop {
        // Every unresolved node keeps at least one unresolved predecessor,
        // otherwise Kahn's algorithm would have drained it.
        let Some(next) = tasks[&current]
            .predecessors()
            .find(|p| remaining.contains(*p))
            .cloned()
        else {
            return path;
        };
        if let Some(pos) = path.iter().position(|id| *id == next) {
            // The walk followed predecessor edges, so reverse to get
            // dependency order, then close the loop.
            let mut cycle: Vec<TaskId> = path[pos..].to_vec();
            cycle.reverse();
            let first = cycle[0].clone();
            cycle.push(first);
            return cycle;
        }
        path.push(next.clone());
        current = next;
    }
}
