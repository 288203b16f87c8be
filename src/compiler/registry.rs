//! The result compiler: a registry of project assemblies plus the
//! compilation history.

use super::assembly::{BulkRegisterSummary, CompilationStatus, ConflictResolution, ProjectAssembly};
use super::models::{Artifact, CompilationResult, CompilationSummary, ProjectType};
use crate::error::{CoordinatorError, Result};
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Handle to one project's assembly. Cloneable; all clones share the
/// same serialized state.
pub type ProjectHandle = Arc<RwLock<ProjectAssembly>>;

/// Collects artifacts from heterogeneous producers and materializes
/// validated project trees.
pub struct ResultCompiler {
    output_base: PathBuf,
    projects: DashMap<String, ProjectHandle>,
    history: RwLock<Vec<CompilationSummary>>,
}

impl ResultCompiler {
    pub fn new(output_base: impl Into<PathBuf>) -> Self {
        Self {
            output_base: output_base.into(),
            projects: DashMap::new(),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Create a project assembly. A colliding name gets a version
    /// suffix (`_v1`, `_v2`, ...); the name actually used is returned.
    pub fn create_project(&self, name: &str, project_type: ProjectType) -> (String, ProjectHandle) {
        let mut chosen = name.to_string();
        if self.projects.contains_key(&chosen) {
            let mut version = 1;
            loop {
                let candidate = format!("{name}_v{version}");
                if !self.projects.contains_key(&candidate) {
                    chosen = candidate;
                    break;
                }
                version += 1;
            }
            warn!(requested = %name, using = %chosen, "project name collision");
        }

        let handle: ProjectHandle =
            Arc::new(RwLock::new(ProjectAssembly::new(chosen.clone(), project_type)));
        self.projects.insert(chosen.clone(), handle.clone());
        info!(project = %chosen, kind = %project_type, "project created");
        (chosen, handle)
    }

    /// Look up an existing project by name.
    pub fn project(&self, name: &str) -> Result<ProjectHandle> {
        self.projects
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CoordinatorError::UnknownProject(name.to_string()))
    }

    /// Register one artifact with a project.
    pub async fn register_artifact(&self, name: &str, artifact: Artifact) -> Result<Uuid> {
        let handle = self.project(name)?;
        let mut assembly = handle.write().await;
        Ok(assembly.register(artifact))
    }

    /// Register a batch of artifacts from one producer.
    pub async fn bulk_register(
        &self,
        name: &str,
        artifacts: Vec<Artifact>,
        producer: &str,
    ) -> Result<BulkRegisterSummary> {
        let handle = self.project(name)?;
        let mut assembly = handle.write().await;
        Ok(assembly.bulk_register(artifacts, producer))
    }

    /// Resolve path and name conflicts in a project.
    pub async fn resolve_conflicts(&self, name: &str) -> Result<Vec<ConflictResolution>> {
        let handle = self.project(name)?;
        let mut assembly = handle.write().await;
        Ok(assembly.resolve_conflicts())
    }

    /// Current assembly status without re-running validation.
    pub async fn project_status(&self, name: &str) -> Result<CompilationStatus> {
        let handle = self.project(name)?;
        let assembly = handle.read().await;
        Ok(assembly.compilation_status())
    }

    /// Materialize a project into the output base directory.
    pub async fn compile(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<CompilationResult> {
        let handle = self.project(name)?;
        let mut assembly = handle.write().await;
        let result = assembly.materialize(&self.output_base, cancel).await?;
        self.history.write().await.push(result.summary());
        Ok(result)
    }

    /// Summaries of every completed compilation, oldest first.
    pub async fn compilation_history(&self) -> Vec<CompilationSummary> {
        self.history.read().await.clone()
    }
}
