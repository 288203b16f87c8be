//! Plan model and DAG construction.

pub mod builder;
pub mod models;

pub use builder::{assert_acyclic, ingest_plan, topological_order, IngestedPlan};
pub use models::{AgentType, Effort, Milestone, Plan, PlanAnalysis, Resource, Task, TaskId, TaskSpec};
