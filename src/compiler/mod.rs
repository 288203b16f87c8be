//! Result compilation: assembling worker artifacts into a validated
//! project tree.

pub mod assembly;
pub mod materialize;
pub mod models;
pub mod registry;

pub use assembly::{BulkRegisterSummary, ConflictResolution, ProjectAssembly};
pub use models::{
    Artifact, ArtifactContent, CompilationResult, ComponentType, ProjectStructure, ProjectType,
    ValidationLevel, ValidationMessage,
};
pub use registry::ResultCompiler;
