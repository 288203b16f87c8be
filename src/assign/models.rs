//! Assignment types: per-agent instructions, execution phases, validation.

use crate::plan::models::{AgentType, Effort, TaskId};
use crate::schedule::models::{Priority, Schedule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One unit of work handed to an agent, with enough context for a
/// dispatcher to render the queue without joining back to the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub task_id: TaskId,
    pub name: String,
    pub description: String,
    pub milestone: String,
    pub milestone_index: usize,
    pub effort: Effort,
    pub priority: Priority,
    pub earliest_start: i64,
    pub latest_start: i64,
    pub is_critical: bool,
    /// Whether the task has predecessors it must wait for
    pub is_blocked: bool,
    /// Owning agent for every predecessor of this task
    pub predecessor_ownership: BTreeMap<TaskId, AgentType>,
}

/// A task entry within an execution phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTask {
    pub task_id: TaskId,
    pub agent: AgentType,
    pub priority: Priority,
    pub is_critical: bool,
}

/// One parallel phase of the execution plan with agent ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPhase {
    pub phase: usize,
    pub tasks: Vec<PhaseTask>,
}

/// Outcome of plan validation. The plan is always returned alongside so
/// operators can inspect the issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanValidation {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub validated_at: DateTime<Utc>,
}

/// The complete executable plan: enriched schedule, per-agent queues,
/// phase layout, and validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub schedule: Schedule,
    /// Ordered work queue per agent type
    pub assignments: BTreeMap<AgentType, Vec<Instruction>>,
    pub execution_phases: Vec<ExecutionPhase>,
    pub validation: PlanValidation,
}

impl ExecutionPlan {
    /// The agent a task is assigned to.
    pub fn agent_of(&self, task: &TaskId) -> Option<AgentType> {
        self.assignments.iter().find_map(|(agent, queue)| {
            queue.iter().any(|i| &i.task_id == task).then_some(*agent)
        })
    }

    /// The instruction for a task, if assigned.
    pub fn instruction(&self, task: &TaskId) -> Option<&Instruction> {
        self.assignments
            .values()
            .flat_map(|queue| queue.iter())
            .find(|i| &i.task_id == task)
    }

    /// The execution phase containing a task.
    pub fn phase_of(&self, task: &TaskId) -> Option<usize> {
        self.execution_phases
            .iter()
            .find(|p| p.tasks.iter().any(|t| &t.task_id == task))
            .map(|p| p.phase)
    }
}
