//! Per-project artifact assembly: registration, conflict resolution,
//! and validation against the project structure.

use super::models::{
    Artifact, ComponentType, ProjectStructure, ProjectType, ValidationLevel, ValidationMessage,
    ValidationSummary,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What kind of conflict was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    Path,
    Name,
}

/// Record of one resolved conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub kind: ConflictKind,
    pub artifact_id: Uuid,
    pub original: String,
    pub renamed_to: String,
}

/// Outcome of a bulk registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRegisterSummary {
    pub success: bool,
    pub added: Vec<Uuid>,
    pub failed: Vec<String>,
}

/// Collapse `.` segments and redundant separators so path collisions
/// compare on the same form. Rejects nothing; traversal segments are
/// caught during validation.
pub(crate) fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Lowercase, space-to-underscore form of a name used for synthesized
/// file paths.
pub(crate) fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Split a path into (stem, extension) where the extension keeps its dot.
fn split_extension(path: &str) -> (&str, &str) {
    match path.rfind('.') {
        Some(idx) if idx > path.rfind('/').map(|s| s + 1).unwrap_or(0) => path.split_at(idx),
        _ => (path, ""),
    }
}

/// Rename a conflicting path to `<stem>_from_<producer><ext>`.
fn conflict_rename(path: &str, producer: &str) -> String {
    let (stem, ext) = split_extension(path);
    format!("{stem}_from_{producer}{ext}")
}

/// The artifact collection for one project.
///
/// Mutations are `&mut self`; the registry wraps each assembly in a
/// writer lock so registration is serialized per project.
pub struct ProjectAssembly {
    project_name: String,
    project_type: ProjectType,
    structure: ProjectStructure,
    artifacts: BTreeMap<Uuid, Artifact>,
    /// Registration order; breaks timestamp ties deterministically
    order: Vec<Uuid>,
    by_path: BTreeMap<String, Uuid>,
    registration_messages: Vec<ValidationMessage>,
    structural_messages: Vec<ValidationMessage>,
    resolutions: Vec<ConflictResolution>,
}

impl ProjectAssembly {
    pub fn new(project_name: impl Into<String>, project_type: ProjectType) -> Self {
        let project_name = project_name.into();
        info!(project = %project_name, kind = %project_type, "project assembly created");
        Self {
            project_name,
            project_type,
            structure: ProjectStructure::default_for(project_type),
            artifacts: BTreeMap::new(),
            order: Vec::new(),
            by_path: BTreeMap::new(),
            registration_messages: Vec::new(),
            structural_messages: Vec::new(),
            resolutions: Vec::new(),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn structure(&self) -> &ProjectStructure {
        &self.structure
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.order.iter().filter_map(|id| self.artifacts.get(id))
    }

    pub fn artifact(&self, id: Uuid) -> Option<&Artifact> {
        self.artifacts.get(&id)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// All validation messages: registration-time conflicts plus the
    /// latest structural validation.
    pub fn validation_messages(&self) -> Vec<ValidationMessage> {
        self.registration_messages
            .iter()
            .chain(self.structural_messages.iter())
            .cloned()
            .collect()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register one artifact.
    ///
    /// A path collision renames the incoming artifact to
    /// `<stem>_from_<producer><ext>`, emits a WARNING naming both
    /// artifacts, and records a resolution.
    pub fn register(&mut self, mut artifact: Artifact) -> Uuid {
        if let Some(raw_path) = artifact.file_path.take() {
            let normalized = normalize_path(&raw_path);
            if let Some(existing_id) = self.by_path.get(&normalized).copied() {
                let renamed = conflict_rename(&normalized, &artifact.producer_agent);
                let existing_producer = self
                    .artifacts
                    .get(&existing_id)
                    .map(|a| a.producer_agent.clone())
                    .unwrap_or_default();
                warn!(
                    path = %normalized,
                    renamed = %renamed,
                    "artifact path conflict at registration"
                );
                self.registration_messages.push(
                    ValidationMessage::new(
                        ValidationLevel::Warning,
                        format!(
                            "artifact path conflict: {normalized} already registered by agent {existing_producer}"
                        ),
                    )
                    .for_artifact(artifact.id)
                    .with_related(vec![existing_id]),
                );
                self.resolutions.push(ConflictResolution {
                    kind: ConflictKind::Path,
                    artifact_id: artifact.id,
                    original: normalized,
                    renamed_to: renamed.clone(),
                });
                artifact.file_path = Some(renamed);
            } else {
                artifact.file_path = Some(normalized);
            }
        }

        if let Some(path) = &artifact.file_path {
            self.by_path.insert(path.clone(), artifact.id);
        }
        let id = artifact.id;
        debug!(artifact = %id, name = %artifact.name, "artifact registered");
        self.order.push(id);
        self.artifacts.insert(id, artifact);
        id
    }

    /// Register a batch from one producer, collecting per-item failures
    /// instead of aborting the batch.
    pub fn bulk_register(
        &mut self,
        artifacts: Vec<Artifact>,
        producer: &str,
    ) -> BulkRegisterSummary {
        let mut added = Vec::new();
        let mut failed = Vec::new();

        for mut artifact in artifacts {
            if artifact.name.trim().is_empty() {
                failed.push("artifact with empty name skipped".to_string());
                continue;
            }
            artifact.producer_agent = producer.to_string();
            added.push(self.register(artifact));
        }

        info!(
            project = %self.project_name,
            added = added.len(),
            failed = failed.len(),
            "bulk registration finished"
        );
        BulkRegisterSummary {
            success: failed.is_empty(),
            added,
            failed,
        }
    }

    /// Remove an artifact and scrub it from dependency lists.
    pub fn remove_artifact(&mut self, id: Uuid) -> bool {
        let Some(artifact) = self.artifacts.remove(&id) else {
            return false;
        };
        if let Some(path) = &artifact.file_path {
            if self.by_path.get(path) == Some(&id) {
                self.by_path.remove(path);
            }
        }
        self.order.retain(|o| *o != id);
        for other in self.artifacts.values_mut() {
            other.dependencies.retain(|d| *d != id);
        }
        true
    }

    pub fn artifacts_by_type(&self, component_type: ComponentType) -> Vec<&Artifact> {
        self.artifacts()
            .filter(|a| a.component_type == component_type)
            .collect()
    }

    pub fn artifacts_by_producer(&self, producer: &str) -> Vec<&Artifact> {
        self.artifacts()
            .filter(|a| a.producer_agent == producer)
            .collect()
    }

    // ========================================================================
    // Conflict resolution
    // ========================================================================

    fn registration_position(&self, id: Uuid) -> usize {
        self.order.iter().position(|o| *o == id).unwrap_or(0)
    }

    /// Resolve duplicate normalized paths and duplicate (name, type)
    /// pairs. The newest artifact (by timestamp, then registration
    /// order) keeps the contested path or name; the others are renamed.
    /// Returns every resolution recorded so far, registration-time ones
    /// included.
    pub fn resolve_conflicts(&mut self) -> Vec<ConflictResolution> {
        // Duplicate normalized paths.
        let mut by_path: BTreeMap<String, Vec<Uuid>> = BTreeMap::new();
        for artifact in self.artifacts.values() {
            if let Some(path) = &artifact.file_path {
                by_path
                    .entry(normalize_path(path))
                    .or_default()
                    .push(artifact.id);
            }
        }
        for (path, mut ids) in by_path {
            if ids.len() <= 1 {
                continue;
            }
            ids.sort_by_key(|id| {
                let ts = self
                    .artifacts
                    .get(id)
                    .map(|a| a.timestamp)
                    .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC);
                std::cmp::Reverse((ts, self.registration_position(*id)))
            });
            // ids[0] is the newest and keeps the path.
            for id in ids.into_iter().skip(1) {
                let Some(artifact) = self.artifacts.get(&id) else {
                    continue;
                };
                let renamed = conflict_rename(&path, &artifact.producer_agent);
                warn!(path = %path, renamed = %renamed, "resolved path conflict");
                self.resolutions.push(ConflictResolution {
                    kind: ConflictKind::Path,
                    artifact_id: id,
                    original: path.clone(),
                    renamed_to: renamed.clone(),
                });
                self.by_path.insert(renamed.clone(), id);
                if let Some(artifact) = self.artifacts.get_mut(&id) {
                    artifact.file_path = Some(renamed);
                }
            }
            // Re-point the contested path at the keeper.
            if let Some(keeper) = self
                .artifacts
                .values()
                .find(|a| a.file_path.as_deref() == Some(path.as_str()))
            {
                self.by_path.insert(path.clone(), keeper.id);
            }
        }

        // Duplicate (name, type) pairs.
        let mut by_name: BTreeMap<(String, ComponentType), Vec<Uuid>> = BTreeMap::new();
        for artifact in self.artifacts.values() {
            by_name
                .entry((artifact.name.clone(), artifact.component_type))
                .or_default()
                .push(artifact.id);
        }
        for ((name, _), mut ids) in by_name {
            if ids.len() <= 1 {
                continue;
            }
            ids.sort_by_key(|id| {
                let ts = self
                    .artifacts
                    .get(id)
                    .map(|a| a.timestamp)
                    .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC);
                std::cmp::Reverse((ts, self.registration_position(*id)))
            });
            for id in ids.into_iter().skip(1) {
                let Some(artifact) = self.artifacts.get_mut(&id) else {
                    continue;
                };
                let renamed = format!("{name} from {}", artifact.producer_agent);
                artifact.name = renamed.clone();
                self.resolutions.push(ConflictResolution {
                    kind: ConflictKind::Name,
                    artifact_id: id,
                    original: name.clone(),
                    renamed_to: renamed,
                });
            }
        }

        info!(
            project = %self.project_name,
            resolutions = self.resolutions.len(),
            "conflict resolution finished"
        );
        self.resolutions.clone()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Re-run structural validation over the whole assembly.
    ///
    /// ERROR: dependency cycles and missing dependencies. WARNING:
    /// missing required files, paths outside the permitted prefixes.
    /// INFO: component types with no artifact.
    pub fn validate_all(&mut self) -> Vec<ValidationMessage> {
        self.structural_messages.clear();

        self.validate_dependencies();
        self.validate_paths();
        self.validate_requirements();

        let summary = ValidationSummary::from_messages(&self.structural_messages);
        info!(
            project = %self.project_name,
            errors = summary.error_count,
            warnings = summary.warning_count,
            infos = summary.info_count,
            "validation finished"
        );
        self.validation_messages()
    }

    fn validate_dependencies(&mut self) {
        // Missing references.
        let mut messages = Vec::new();
        for artifact in self.artifacts.values() {
            for dep in &artifact.dependencies {
                if !self.artifacts.contains_key(dep) {
                    messages.push(
                        ValidationMessage::new(
                            ValidationLevel::Error,
                            format!("dependency {dep} of artifact '{}' not found", artifact.name),
                        )
                        .for_artifact(artifact.id),
                    );
                }
            }
        }

        // Cycles, via iterative DFS with an explicit color map.
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Grey,
            Black,
        }
        let mut color: BTreeMap<Uuid, Color> =
            self.artifacts.keys().map(|id| (*id, Color::White)).collect();

        for &start in self.artifacts.keys().collect::<Vec<_>>() {
            if color[&start] != Color::White {
                continue;
            }
            let mut stack = vec![(start, false)];
            let mut path: Vec<Uuid> = Vec::new();
            while let Some((node, children_done)) = stack.pop() {
                if children_done {
                    color.insert(node, Color::Black);
                    path.pop();
                    continue;
                }
                color.insert(node, Color::Grey);
                path.push(node);
                stack.push((node, true));
                let deps = self
                    .artifacts
                    .get(&node)
                    .map(|a| a.dependencies.clone())
                    .unwrap_or_default();
                for dep in deps {
                    match color.get(&dep) {
                        Some(Color::White) => stack.push((dep, false)),
                        Some(Color::Grey) => {
                            let cycle_start =
                                path.iter().position(|p| *p == dep).unwrap_or(0);
                            let mut cycle: Vec<String> = path[cycle_start..]
                                .iter()
                                .map(|id| id.to_string())
                                .collect();
                            cycle.push(dep.to_string());
                            messages.push(
                                ValidationMessage::new(
                                    ValidationLevel::Error,
                                    format!(
                                        "circular dependency detected: {}",
                                        cycle.join(" -> ")
                                    ),
                                )
                                .for_artifact(node),
                            );
                        }
                        _ => {}
                    }
                }
            }
        }

        self.structural_messages.extend(messages);
    }

    fn validate_paths(&mut self) {
        let mut messages = Vec::new();
        for artifact in self.artifacts.values() {
            let Some(path) = &artifact.file_path else {
                continue;
            };
            let permitted = self.structure.permitted_dirs(artifact.component_type);
            let allowed = permitted.iter().any(|dir| {
                if dir == "." {
                    // Root-level files only.
                    !path.contains('/')
                } else {
                    path.starts_with(&format!("{dir}/"))
                }
            });
            if !allowed {
                let suggested = permitted.first().map(String::as_str).unwrap_or(".");
                messages.push(
                    ValidationMessage::new(
                        ValidationLevel::Warning,
                        format!(
                            "file path {path} does not match the permitted directories for {} artifacts; consider {suggested}/",
                            artifact.component_type
                        ),
                    )
                    .for_artifact(artifact.id),
                );
            }
        }
        self.structural_messages.extend(messages);
    }

    fn validate_requirements(&mut self) {
        for required in &self.structure.required_files {
            let present = self
                .artifacts
                .values()
                .any(|a| a.file_path.as_deref() == Some(required.as_str()));
            if !present {
                self.structural_messages.push(ValidationMessage::new(
                    ValidationLevel::Warning,
                    format!("required file {required} not found in project"),
                ));
            }
        }

        for component_type in ComponentType::ALL {
            if component_type == ComponentType::Build {
                continue;
            }
            if !self
                .artifacts
                .values()
                .any(|a| a.component_type == component_type)
            {
                self.structural_messages.push(ValidationMessage::new(
                    ValidationLevel::Info,
                    format!("no artifacts of type {component_type} present"),
                ));
            }
        }
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Current counts and gaps, without re-running validation.
    pub fn compilation_status(&self) -> CompilationStatus {
        let mut component_types = BTreeMap::new();
        for artifact in self.artifacts.values() {
            *component_types
                .entry(artifact.component_type.as_str().to_string())
                .or_insert(0) += 1;
        }
        let messages = self.validation_messages();
        let validation = ValidationSummary::from_messages(&messages);
        let missing_required_files = self
            .structure
            .required_files
            .iter()
            .filter(|required| {
                !self
                    .artifacts
                    .values()
                    .any(|a| a.file_path.as_deref() == Some(required.as_str()))
            })
            .cloned()
            .collect();

        CompilationStatus {
            project_name: self.project_name.clone(),
            project_type: self.project_type,
            artifact_count: self.artifacts.len(),
            component_types,
            has_errors: validation.has_errors,
            validation,
            missing_required_files,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn artifact_mut(&mut self, id: Uuid) -> Option<&mut Artifact> {
        self.artifacts.get_mut(&id)
    }

    pub(crate) fn path_taken(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub(crate) fn claim_path(&mut self, path: String, id: Uuid) {
        self.by_path.insert(path, id);
    }

    pub(crate) fn ids_in_order(&self) -> Vec<Uuid> {
        self.order.clone()
    }
}

/// Snapshot of an assembly's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationStatus {
    pub project_name: String,
    pub project_type: ProjectType,
    pub artifact_count: usize,
    pub component_types: BTreeMap<String, usize>,
    pub validation: ValidationSummary,
    pub has_errors: bool,
    pub missing_required_files: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::models::ArtifactContent;
    use chrono::Duration;

    fn text_artifact(name: &str, producer: &str) -> Artifact {
        Artifact::new(
            name,
            ComponentType::Code,
            producer,
            ArtifactContent::Text(format!("// {name}")),
        )
    }

    // ========================================================================
    // Path normalization
    // ========================================================================

    #[test]
    fn test_normalize_path_collapses_dots() {
        assert_eq!(normalize_path("./src/index.js"), "src/index.js");
        assert_eq!(normalize_path("src//utils/./mod.js"), "src/utils/mod.js");
        assert_eq!(normalize_path("README.md"), "README.md");
    }

    #[test]
    fn test_conflict_rename_keeps_extension() {
        assert_eq!(
            conflict_rename("src/index.js", "qa"),
            "src/index_from_qa.js"
        );
        assert_eq!(conflict_rename("Makefile", "build"), "Makefile_from_build");
        assert_eq!(
            conflict_rename("docs/api.spec.md", "writer"),
            "docs/api.spec_from_writer.md"
        );
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Login Page Component"), "login_page_component");
    }

    // ========================================================================
    // Registration & conflicts
    // ========================================================================

    #[test]
    fn test_register_stores_normalized_path() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::WebApp);
        let id = assembly.register(text_artifact("index", "frontend").with_file_path("./src/index.js"));
        assert_eq!(
            assembly.artifact(id).unwrap().file_path.as_deref(),
            Some("src/index.js")
        );
    }

    #[test]
    fn test_register_renames_on_collision() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::WebApp);
        let newer = assembly.register(text_artifact("index", "frontend").with_file_path("src/index.js"));
        let older = assembly.register(text_artifact("index qa", "qa").with_file_path("src/index.js"));

        assert_eq!(
            assembly.artifact(newer).unwrap().file_path.as_deref(),
            Some("src/index.js")
        );
        assert_eq!(
            assembly.artifact(older).unwrap().file_path.as_deref(),
            Some("src/index_from_qa.js")
        );

        let warnings = assembly.validation_messages();
        let conflict = warnings
            .iter()
            .find(|m| m.level == ValidationLevel::Warning)
            .unwrap();
        assert!(conflict.message.contains("src/index.js"));
        assert_eq!(conflict.artifact_id, Some(older));
        assert_eq!(conflict.related_artifact_ids, vec![newer]);

        let resolutions = assembly.resolve_conflicts();
        assert!(resolutions
            .iter()
            .any(|r| r.kind == ConflictKind::Path && r.artifact_id == older));
    }

    #[test]
    fn test_resolve_keeps_newest_by_timestamp() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::WebApp);
        let base = Utc::now();
        // Same name and type from two producers; the newer one keeps it.
        let old_id = assembly.register(
            text_artifact("Cart", "frontend").with_timestamp(base - Duration::hours(2)),
        );
        let new_id = assembly.register(text_artifact("Cart", "qa").with_timestamp(base));

        assembly.resolve_conflicts();
        assert_eq!(assembly.artifact(new_id).unwrap().name, "Cart");
        assert_eq!(assembly.artifact(old_id).unwrap().name, "Cart from frontend");
    }

    #[test]
    fn test_bulk_register_collects_failures() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::Generic);
        let summary = assembly.bulk_register(
            vec![
                text_artifact("One", "ignored"),
                text_artifact("", "ignored"),
                text_artifact("Two", "ignored"),
            ],
            "backend",
        );
        assert!(!summary.success);
        assert_eq!(summary.added.len(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert!(assembly
            .artifacts()
            .all(|a| a.producer_agent == "backend"));
    }

    #[test]
    fn test_remove_artifact_scrubs_dependencies() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::Generic);
        let a = assembly.register(text_artifact("A", "dev"));
        let b = text_artifact("B", "dev").with_dependencies(vec![a]);
        let b_id = assembly.register(b);

        assert!(assembly.remove_artifact(a));
        assert!(assembly.artifact(b_id).unwrap().dependencies.is_empty());
        assert!(!assembly.remove_artifact(a));
    }

    // ========================================================================
    // Validation
    // ========================================================================

    #[test]
    fn test_missing_dependency_is_error() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::Generic);
        let ghost = Uuid::new_v4();
        assembly.register(text_artifact("A", "dev").with_dependencies(vec![ghost]));

        let messages = assembly.validate_all();
        assert!(messages
            .iter()
            .any(|m| m.level == ValidationLevel::Error && m.message.contains("not found")));
    }

    #[test]
    fn test_dependency_cycle_is_error() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::Generic);
        let a = text_artifact("A", "dev");
        let b = text_artifact("B", "dev");
        let a_id = a.id;
        let b_id = b.id;
        assembly.register(a.with_dependencies(vec![b_id]));
        assembly.register(b.with_dependencies(vec![a_id]));

        let messages = assembly.validate_all();
        assert!(messages
            .iter()
            .any(|m| m.level == ValidationLevel::Error
                && m.message.contains("circular dependency")));
    }

    #[test]
    fn test_missing_required_file_is_warning() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::WebApp);
        assembly.register(text_artifact("index", "dev").with_file_path("src/index.js"));

        let messages = assembly.validate_all();
        assert!(messages
            .iter()
            .any(|m| m.level == ValidationLevel::Warning
                && m.message.contains("package.json")));
    }

    #[test]
    fn test_path_outside_permitted_prefix_is_warning() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::WebApp);
        assembly.register(text_artifact("stray", "dev").with_file_path("weird/stray.js"));

        let messages = assembly.validate_all();
        assert!(messages.iter().any(|m| {
            m.level == ValidationLevel::Warning
                && m.message.contains("does not match the permitted directories")
        }));
    }

    #[test]
    fn test_absent_component_type_is_info() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::Generic);
        assembly.register(text_artifact("A", "dev"));

        let messages = assembly.validate_all();
        assert!(messages
            .iter()
            .any(|m| m.level == ValidationLevel::Info && m.message.contains("documentation")));
        // Build artifacts are optional and never reported as absent.
        assert!(!messages
            .iter()
            .any(|m| m.level == ValidationLevel::Info && m.message.contains("type build")));
    }

    #[test]
    fn test_compilation_status_counts() {
        let mut assembly = ProjectAssembly::new("shop", ProjectType::WebApp);
        assembly.register(text_artifact("index", "dev").with_file_path("src/index.js"));
        assembly.register(Artifact::new(
            "readme",
            ComponentType::Documentation,
            "writer",
            ArtifactContent::Text("# Shop".into()),
        ));

        let status = assembly.compilation_status();
        assert_eq!(status.artifact_count, 2);
        assert_eq!(status.component_types["code"], 1);
        assert!(status
            .missing_required_files
            .contains(&"package.json".to_string()));
    }
}
