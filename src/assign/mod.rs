//! Agent assignment: skill matching, workload balancing, work queues.

pub mod engine;
pub mod models;

pub use engine::build_execution_plan;
pub use models::{ExecutionPhase, ExecutionPlan, Instruction, PhaseTask, PlanValidation};
