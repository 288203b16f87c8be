//! Schedule types produced by the CPM engine.

use crate::plan::models::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Execution priority of a scheduled task.
///
/// Variant order is ascending so `Ord` can be used directly for
/// priority comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// CPM timing for one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskNode {
    pub id: TaskId,
    pub earliest_start: i64,
    pub earliest_finish: i64,
    pub latest_start: i64,
    pub latest_finish: i64,
    pub is_critical: bool,
    pub priority: Priority,
}

impl TaskNode {
    /// Total slack: how far the task can slip without moving the project
    /// end. Zero slack means the task is on the critical path.
    pub fn slack(&self) -> i64 {
        self.latest_start - self.earliest_start
    }
}

/// A group of tasks sharing the same earliest start, executable in
/// parallel. Tasks are ordered by (priority desc, id asc).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseGroup {
    /// 1-based phase number
    pub phase: usize,
    /// Earliest-start bucket key (scheduling day)
    pub start: i64,
    pub tasks: Vec<TaskId>,
}

/// Planned timing window for one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseWindow {
    pub phase: usize,
    pub start_day: i64,
    pub end_day: i64,
    pub duration_days: i64,
}

/// Planned project timeline derived from the phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub phases: Vec<PhaseWindow>,
    pub total_duration_days: i64,
    pub estimated_start: DateTime<Utc>,
    pub estimated_end: DateTime<Utc>,
}

impl Timeline {
    /// The planned window for a phase, if it exists.
    pub fn window(&self, phase: usize) -> Option<&PhaseWindow> {
        self.phases.iter().find(|w| w.phase == phase)
    }
}

/// A verification point inserted after every N phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub checkpoint_id: String,
    pub after_phase: usize,
    /// Name of the highest milestone reached by the checkpoint's phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_reached: Option<String>,
    /// Scheduling day at which the checkpoint falls
    pub day: i64,
}

/// The complete schedule for a plan.
///
/// `nodes`, `edges`, `critical_path` and `phases` are produced by the
/// CPM engine; `checkpoints` and `timeline` are filled in by the
/// assignment engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub nodes: BTreeMap<TaskId, TaskNode>,
    /// Dependency edges as (predecessor, successor) pairs
    pub edges: Vec<(TaskId, TaskId)>,
    /// Critical tasks ordered by earliest start (ties by id)
    pub critical_path: Vec<TaskId>,
    pub phases: Vec<PhaseGroup>,
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Timeline>,
}

impl Schedule {
    /// Total project duration implied by the CPM forward pass.
    pub fn project_end(&self) -> i64 {
        self.nodes.values().map(|n| n.earliest_finish).max().unwrap_or(0)
    }

    /// The phase containing `task`, if any.
    pub fn phase_of(&self, task: &TaskId) -> Option<usize> {
        self.phases
            .iter()
            .find(|group| group.tasks.contains(task))
            .map(|group| group.phase)
    }

    /// Whether `task` is on the critical path.
    pub fn is_critical(&self, task: &TaskId) -> bool {
        self.nodes.get(task).map(|n| n.is_critical).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_priority_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Priority::Critical).unwrap(), "\"CRITICAL\"");
        let parsed: Priority = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(parsed, Priority::Low);
    }

    #[test]
    fn test_task_node_slack() {
        let node = TaskNode {
            id: TaskId::from("t"),
            earliest_start: 2,
            earliest_finish: 4,
            latest_start: 5,
            latest_finish: 7,
            is_critical: false,
            priority: Priority::Medium,
        };
        assert_eq!(node.slack(), 3);
    }

    #[test]
    fn test_schedule_phase_lookup() {
        let schedule = Schedule {
            nodes: BTreeMap::new(),
            edges: vec![],
            critical_path: vec![],
            phases: vec![
                PhaseGroup {
                    phase: 1,
                    start: 0,
                    tasks: vec![TaskId::from("a")],
                },
                PhaseGroup {
                    phase: 2,
                    start: 2,
                    tasks: vec![TaskId::from("b")],
                },
            ],
            checkpoints: vec![],
            timeline: None,
        };
        assert_eq!(schedule.phase_of(&TaskId::from("b")), Some(2));
        assert_eq!(schedule.phase_of(&TaskId::from("z")), None);
    }
}
