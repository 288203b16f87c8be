//! Plan input types and the normalized task model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable identifier of a task within a plan.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Effort level of a task, mapped to a duration in scheduling days.
///
/// The "day" is a dimensionless scheduling tick; calendar mapping is the
/// caller's concern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Effort {
    Low,
    #[default]
    Medium,
    High,
}

impl Effort {
    /// Duration in scheduling days: LOW=1, MEDIUM=2, HIGH=3.
    pub fn duration_days(&self) -> i64 {
        match self {
            Effort::Low => 1,
            Effort::Medium => 2,
            Effort::High => 3,
        }
    }
}

/// Worker agent type a task can be assigned to.
///
/// `ALL` lists the variants in the fixed tie-break order used by skill
/// matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    SolutionArchitect,
    FullStackDeveloper,
    QaTest,
    ProjectManager,
}

impl AgentType {
    pub const ALL: [AgentType; 4] = [
        AgentType::SolutionArchitect,
        AgentType::FullStackDeveloper,
        AgentType::QaTest,
        AgentType::ProjectManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::SolutionArchitect => "solution_architect",
            AgentType::FullStackDeveloper => "full_stack_developer",
            AgentType::QaTest => "qa_test",
            AgentType::ProjectManager => "project_manager",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource descriptor in the plan's resource pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Agent type this resource provides
    pub agent_type: AgentType,
    /// Skills offered by the resource
    #[serde(default)]
    pub skills: BTreeSet<String>,
    /// Relative capacity fraction (1.0 = one full-time agent)
    #[serde(default = "default_capacity")]
    pub capacity: f64,
}

fn default_capacity() -> f64 {
    1.0
}

/// A task as declared in the input plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Optional stable id; synthesized when absent or duplicated
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Ids of tasks this task declares as predecessors
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub effort: Effort,
    #[serde(default)]
    pub description: Option<String>,
}

/// A milestone: an ordered group of tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

/// The declarative project plan submitted to the coordinator.
///
/// Immutable once accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub resource_pool: Vec<Resource>,
}

/// A normalized atomic task derived from the plan.
///
/// Immutable after ingestion except for its progress record, which is
/// owned by the progress tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub milestone: String,
    /// 0-based order of the owning milestone within the plan
    pub milestone_index: usize,
    pub effort: Effort,
    pub description: String,
    /// Predecessors declared by the plan
    pub declared_predecessors: BTreeSet<TaskId>,
    /// Predecessors added by cross-milestone dependency inference
    pub inferred_predecessors: BTreeSet<TaskId>,
    /// Required proficiency per agent type, in [0, 1]
    pub skill_requirements: BTreeMap<AgentType, f64>,
}

impl Task {
    /// All predecessors, declared and inferred.
    pub fn predecessors(&self) -> impl Iterator<Item = &TaskId> {
        self.declared_predecessors
            .iter()
            .chain(self.inferred_predecessors.iter())
    }

    /// Whether `id` is a predecessor of this task.
    pub fn depends_on(&self, id: &TaskId) -> bool {
        self.declared_predecessors.contains(id) || self.inferred_predecessors.contains(id)
    }
}

/// Structural summary produced during ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanAnalysis {
    pub total_milestones: usize,
    pub total_tasks: usize,
    pub task_counts_by_milestone: BTreeMap<String, usize>,
    pub resource_types: Vec<AgentType>,
    pub analyzed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effort_duration_mapping() {
        assert_eq!(Effort::Low.duration_days(), 1);
        assert_eq!(Effort::Medium.duration_days(), 2);
        assert_eq!(Effort::High.duration_days(), 3);
    }

    #[test]
    fn test_effort_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Effort::High).unwrap(), "\"HIGH\"");
        let parsed: Effort = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(parsed, Effort::Low);
    }

    #[test]
    fn test_agent_type_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&AgentType::FullStackDeveloper).unwrap(),
            "\"full_stack_developer\""
        );
        let parsed: AgentType = serde_json::from_str("\"qa_test\"").unwrap();
        assert_eq!(parsed, AgentType::QaTest);
    }

    #[test]
    fn test_agent_type_tie_break_order() {
        assert_eq!(
            AgentType::ALL,
            [
                AgentType::SolutionArchitect,
                AgentType::FullStackDeveloper,
                AgentType::QaTest,
                AgentType::ProjectManager,
            ]
        );
    }

    #[test]
    fn test_task_spec_defaults() {
        let spec: TaskSpec = serde_json::from_str(r#"{"name": "Design schema"}"#).unwrap();
        assert!(spec.id.is_none());
        assert!(spec.dependencies.is_empty());
        assert_eq!(spec.effort, Effort::Medium);
    }

    #[test]
    fn test_plan_deserialization() {
        let json = r#"{
            "name": "Shop",
            "milestones": [
                {"name": "Foundation", "tasks": [
                    {"id": "t1", "name": "Design data model", "effort": "HIGH"}
                ]},
                {"name": "Build", "tasks": [
                    {"id": "t2", "name": "Implement data model", "dependencies": ["t1"]}
                ]}
            ],
            "resource_pool": [
                {"agent_type": "full_stack_developer", "skills": ["rust"], "capacity": 1.0}
            ]
        }"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.milestones.len(), 2);
        assert_eq!(plan.milestones[0].tasks[0].effort, Effort::High);
        assert_eq!(plan.resource_pool[0].agent_type, AgentType::FullStackDeveloper);
    }

    #[test]
    fn test_task_predecessor_queries() {
        let task = Task {
            id: TaskId::from("t3"),
            name: "Test data model".into(),
            milestone: "Verify".into(),
            milestone_index: 2,
            effort: Effort::Medium,
            description: String::new(),
            declared_predecessors: [TaskId::from("t2")].into_iter().collect(),
            inferred_predecessors: [TaskId::from("t1")].into_iter().collect(),
            skill_requirements: BTreeMap::new(),
        };
        assert!(task.depends_on(&TaskId::from("t1")));
        assert!(task.depends_on(&TaskId::from("t2")));
        assert!(!task.depends_on(&TaskId::from("t9")));
        assert_eq!(task.predecessors().count(), 2);
    }
}
