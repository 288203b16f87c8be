//! Staged materialization of an assembly into a project directory.
//!
//! All writes land in a scratch directory first; the scratch directory
//! is renamed into its final location only after every file and the
//! compilation metadata have been written. Cancellation or I/O failure
//! therefore never leaves a partially committed tree.

use super::assembly::{normalize_path, slug, ProjectAssembly};
use super::models::{ArtifactContent, CompilationResult, ValidationMessage};
use crate::error::{CoordinatorError, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

fn io_err(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> CoordinatorError {
    let path = path.into();
    move |source| CoordinatorError::Io { path, source }
}

impl ProjectAssembly {
    /// Synthesize a file path for every artifact that lacks one:
    /// `<first permitted dir>/<slug(name)><ext>`, deduplicated against
    /// already-claimed paths.
    pub fn assign_missing_paths(&mut self) {
        for id in self.ids_in_order() {
            let Some(artifact) = self.artifact(id) else {
                continue;
            };
            if artifact.file_path.is_some() {
                continue;
            }

            let component_type = artifact.component_type;
            let producer = artifact.producer_agent.clone();
            let base_dir = self
                .structure()
                .permitted_dirs(component_type)
                .first()
                .cloned()
                .unwrap_or_else(|| ".".to_string());
            let ext = component_type.extension();
            let mut filename = slug(&artifact.name);
            if !filename.ends_with(ext) {
                filename.push_str(ext);
            }

            let join = |name: &str| {
                if base_dir == "." {
                    name.to_string()
                } else {
                    format!("{base_dir}/{name}")
                }
            };

            let mut candidate = normalize_path(&join(&filename));
            if self.path_taken(&candidate) {
                let stem = filename.trim_end_matches(ext).to_string();
                candidate = normalize_path(&join(&format!("{stem}_from_{producer}{ext}")));
                let mut counter = 2;
                while self.path_taken(&candidate) {
                    candidate =
                        normalize_path(&join(&format!("{stem}_from_{producer}_{counter}{ext}")));
                    counter += 1;
                }
            }

            debug!(artifact = %id, path = %candidate, "assigned synthesized path");
            self.claim_path(candidate.clone(), id);
            if let Some(artifact) = self.artifact_mut(id) {
                artifact.file_path = Some(candidate);
            }
        }
    }

    /// Materialize the assembly under `output_base`.
    ///
    /// Resolves conflicts, assigns missing paths, validates, then writes
    /// everything to a staging directory and renames it to
    /// `<output_base>/<project_slug>_<UTC timestamp>`. Returns
    /// `Cancelled` without committing anything if the token fires.
    /// Materialization proceeds even with ERROR-level findings; they are
    /// reported through `CompilationResult::success`.
    pub async fn materialize(
        &mut self,
        output_base: &Path,
        cancel: &CancellationToken,
    ) -> Result<CompilationResult> {
        self.resolve_conflicts();
        self.assign_missing_paths();
        let validation_messages = self.validate_all();

        let timestamp = Utc::now();
        let final_dir = output_base.join(format!(
            "{}_{}",
            slug(self.project_name()),
            timestamp.format("%Y%m%d_%H%M%S")
        ));

        fs::create_dir_all(output_base)
            .await
            .map_err(io_err(output_base))?;
        let staging = tempfile::tempdir_in(output_base).map_err(io_err(output_base))?;

        self.create_directory_tree(staging.path()).await?;
        let files_written = self
            .write_artifact_files(staging.path(), cancel)
            .await?;

        let result = CompilationResult {
            id: Uuid::new_v4(),
            project_name: self.project_name().to_string(),
            project_type: self.project_type(),
            output_dir: final_dir.clone(),
            artifacts: self.artifacts().cloned().collect(),
            validation_messages: validation_messages.clone(),
            files_written,
            timestamp,
            success: !validation_messages
                .iter()
                .any(|m| m.level == super::models::ValidationLevel::Error),
        };

        self.write_metadata(staging.path(), &result, &validation_messages)
            .await?;

        if cancel.is_cancelled() {
            return Err(CoordinatorError::Cancelled);
        }

        // Commit: everything is staged, a single rename publishes it.
        let staged = staging.keep();
        fs::rename(&staged, &final_dir)
            .await
            .map_err(io_err(&final_dir))?;

        info!(
            project = %self.project_name(),
            output = %final_dir.display(),
            files = files_written,
            success = result.success,
            "project materialized"
        );
        Ok(result)
    }

    async fn create_directory_tree(&self, root: &Path) -> Result<()> {
        for (dir, subdirs) in &self.structure().directories {
            let dir_path = root.join(dir);
            fs::create_dir_all(&dir_path)
                .await
                .map_err(io_err(&dir_path))?;
            for subdir in subdirs {
                let subdir_path = dir_path.join(subdir);
                fs::create_dir_all(&subdir_path)
                    .await
                    .map_err(io_err(&subdir_path))?;
            }
        }
        Ok(())
    }

    async fn write_artifact_files(
        &self,
        root: &Path,
        cancel: &CancellationToken,
    ) -> Result<usize> {
        let mut files_written = 0;
        for artifact in self.artifacts() {
            if cancel.is_cancelled() {
                return Err(CoordinatorError::Cancelled);
            }
            let Some(rel_path) = &artifact.file_path else {
                continue;
            };
            let path = root.join(rel_path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await.map_err(io_err(parent))?;
            }

            let bytes = match &artifact.content {
                ArtifactContent::Text(text) => text.clone().into_bytes(),
                ArtifactContent::Json(value) => {
                    let mut rendered = serde_json::to_vec_pretty(value).map_err(|e| {
                        CoordinatorError::Io {
                            path: path.clone(),
                            source: std::io::Error::other(e),
                        }
                    })?;
                    rendered.push(b'\n');
                    rendered
                }
                ArtifactContent::Bytes(raw) => raw.clone(),
            };
            fs::write(&path, bytes).await.map_err(io_err(&path))?;
            files_written += 1;
        }
        Ok(files_written)
    }

    async fn write_metadata(
        &self,
        root: &Path,
        result: &CompilationResult,
        messages: &[ValidationMessage],
    ) -> Result<()> {
        let metadata = serde_json::json!({
            "project_name": result.project_name,
            "project_type": result.project_type,
            "output_dir": result.output_dir,
            "timestamp": result.timestamp,
            "success": result.success,
            "components": result.artifacts,
            "validation_messages": messages,
            "summary": result.summary(),
        });
        let path = root.join("compilation_metadata.json");
        let mut rendered = serde_json::to_vec_pretty(&metadata).map_err(|e| {
            CoordinatorError::Io {
                path: path.clone(),
                source: std::io::Error::other(e),
            }
        })?;
        rendered.push(b'\n');
        fs::write(&path, rendered).await.map_err(io_err(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::models::{Artifact, ComponentType, ProjectType};

    fn artifact(name: &str, component_type: ComponentType) -> Artifact {
        Artifact::new(
            name,
            component_type,
            "dev",
            ArtifactContent::Text(format!("content of {name}")),
        )
    }

    #[test]
    fn test_assign_missing_paths_uses_first_permitted_dir() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::WebApp);
        let code = assembly.register(artifact("Login Page", ComponentType::Code));
        let docs = assembly.register(artifact("Api Guide", ComponentType::Documentation));

        assembly.assign_missing_paths();
        assert_eq!(
            assembly.artifact(code).unwrap().file_path.as_deref(),
            Some("src/login_page.js")
        );
        assert_eq!(
            assembly.artifact(docs).unwrap().file_path.as_deref(),
            Some("docs/api_guide.md")
        );
    }

    #[test]
    fn test_assign_missing_paths_deduplicates() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::Generic);
        let first = assembly.register(artifact("Util", ComponentType::Code));
        let second = assembly.register(Artifact::new(
            "Util",
            ComponentType::Code,
            "qa",
            ArtifactContent::Text("// dup".into()),
        ));

        assembly.assign_missing_paths();
        assert_eq!(
            assembly.artifact(first).unwrap().file_path.as_deref(),
            Some("src/util.js")
        );
        assert_eq!(
            assembly.artifact(second).unwrap().file_path.as_deref(),
            Some("src/util_from_qa.js")
        );
    }

    #[tokio::test]
    async fn test_cancelled_materialize_commits_nothing() {
        let base = tempfile::tempdir().unwrap();
        let mut assembly = ProjectAssembly::new("shop", ProjectType::Generic);
        assembly.register(artifact("A", ComponentType::Code));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = assembly
            .materialize(base.path(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::Cancelled));

        // Only scratch space may remain; no committed project directory.
        let mut entries = std::fs::read_dir(base.path()).unwrap();
        assert!(entries.all(|e| {
            let name = e.unwrap().file_name();
            !name.to_string_lossy().starts_with("shop_")
        }));
    }
}
