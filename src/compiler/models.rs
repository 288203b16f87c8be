//! Artifact and compilation data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Kind of artifact a worker can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Code,
    Documentation,
    Config,
    Resource,
    Test,
    Build,
}

impl ComponentType {
    pub const ALL: [ComponentType; 6] = [
        ComponentType::Code,
        ComponentType::Documentation,
        ComponentType::Config,
        ComponentType::Resource,
        ComponentType::Test,
        ComponentType::Build,
    ];

    /// Default file extension when a path has to be synthesized.
    pub fn extension(&self) -> &'static str {
        match self {
            ComponentType::Code => ".js",
            ComponentType::Documentation => ".md",
            ComponentType::Config => ".json",
            ComponentType::Resource => ".txt",
            ComponentType::Test => ".test.js",
            ComponentType::Build => ".sh",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Code => "code",
            ComponentType::Documentation => "documentation",
            ComponentType::Config => "config",
            ComponentType::Resource => "resource",
            ComponentType::Test => "test",
            ComponentType::Build => "build",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of project being assembled; selects the structure template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    WebApp,
    MobileApp,
    Api,
    Library,
    DesktopApp,
    DataPipeline,
    Generic,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::WebApp => "web_app",
            ProjectType::MobileApp => "mobile_app",
            ProjectType::Api => "api",
            ProjectType::Library => "library",
            ProjectType::DesktopApp => "desktop_app",
            ProjectType::DataPipeline => "data_pipeline",
            ProjectType::Generic => "generic",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

/// A validation finding attached to the assembly or to one artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub id: Uuid,
    pub level: ValidationLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_artifact_ids: Vec<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl ValidationMessage {
    pub fn new(level: ValidationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            artifact_id: None,
            related_artifact_ids: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn for_artifact(mut self, artifact_id: Uuid) -> Self {
        self.artifact_id = Some(artifact_id);
        self
    }

    pub fn with_related(mut self, related: Vec<Uuid>) -> Self {
        self.related_artifact_ids = related;
        self
    }
}

/// Artifact payload: text, structured data, or raw bytes.
///
/// Text is written as UTF-8, structured data as pretty-printed JSON,
/// bytes verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ArtifactContent {
    Text(String),
    Json(serde_json::Value),
    Bytes(Vec<u8>),
}

impl ArtifactContent {
    /// Rendered byte size, for summaries.
    pub fn byte_len(&self) -> usize {
        match self {
            ArtifactContent::Text(s) => s.len(),
            ArtifactContent::Json(v) => v.to_string().len(),
            ArtifactContent::Bytes(b) => b.len(),
        }
    }
}

/// A producer-emitted output registered with the result compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: Uuid,
    pub name: String,
    pub component_type: ComponentType,
    pub producer_agent: String,
    pub content: ArtifactContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl Artifact {
    pub fn new(
        name: impl Into<String>,
        component_type: ComponentType,
        producer_agent: impl Into<String>,
        content: ArtifactContent,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            component_type,
            producer_agent: producer_agent.into(),
            content,
            file_path: None,
            dependencies: Vec::new(),
            metadata: serde_json::Value::Null,
            timestamp: Utc::now(),
        }
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Uuid>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Directory template a project type materializes into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStructure {
    pub project_type: ProjectType,
    pub root_dir: String,
    /// Top-level directory -> subdirectories
    pub directories: BTreeMap<String, Vec<String>>,
    /// Component type -> permitted directory prefixes (first is default)
    pub file_mappings: BTreeMap<ComponentType, Vec<String>>,
    pub required_files: Vec<String>,
}

impl ProjectStructure {
    /// The default structure template for a project type.
    pub fn default_for(project_type: ProjectType) -> Self {
        match project_type {
            ProjectType::WebApp => Self {
                project_type,
                root_dir: "web_app".into(),
                directories: [
                    (
                        "src".to_string(),
                        vec![
                            "components".into(),
                            "pages".into(),
                            "styles".into(),
                            "utils".into(),
                            "hooks".into(),
                        ],
                    ),
                    ("public".to_string(), vec!["images".into(), "fonts".into()]),
                    ("docs".to_string(), vec![]),
                    ("tests".to_string(), vec!["unit".into(), "integration".into()]),
                ]
                .into_iter()
                .collect(),
                file_mappings: [
                    (ComponentType::Code, vec!["src".to_string()]),
                    (
                        ComponentType::Documentation,
                        vec!["docs".to_string(), ".".to_string()],
                    ),
                    (ComponentType::Config, vec![".".to_string()]),
                    (ComponentType::Resource, vec!["public".to_string()]),
                    (ComponentType::Test, vec!["tests".to_string()]),
                    (ComponentType::Build, vec![".".to_string()]),
                ]
                .into_iter()
                .collect(),
                required_files: vec![
                    "package.json".into(),
                    "README.md".into(),
                    "src/index.js".into(),
                ],
            },
            ProjectType::Api => Self {
                project_type,
                root_dir: "api_service".into(),
                directories: [
                    (
                        "src".to_string(),
                        vec![
                            "controllers".into(),
                            "models".into(),
                            "routes".into(),
                            "middleware".into(),
                            "services".into(),
                            "utils".into(),
                        ],
                    ),
                    ("config".to_string(), vec![]),
                    ("docs".to_string(), vec!["api".into()]),
                    ("tests".to_string(), vec!["unit".into(), "integration".into()]),
                ]
                .into_iter()
                .collect(),
                file_mappings: [
                    (ComponentType::Code, vec!["src".to_string()]),
                    (
                        ComponentType::Documentation,
                        vec!["docs".to_string(), ".".to_string()],
                    ),
                    (
                        ComponentType::Config,
                        vec!["config".to_string(), ".".to_string()],
                    ),
                    (ComponentType::Resource, vec!["src/resources".to_string()]),
                    (ComponentType::Test, vec!["tests".to_string()]),
                    (ComponentType::Build, vec![".".to_string()]),
                ]
                .into_iter()
                .collect(),
                required_files: vec![
                    "package.json".into(),
                    "README.md".into(),
                    "src/index.js".into(),
                    "config/default.json".into(),
                ],
            },
            _ => Self {
                project_type,
                root_dir: "project".into(),
                directories: [
                    ("src".to_string(), vec![]),
                    ("docs".to_string(), vec![]),
                    ("tests".to_string(), vec![]),
                    ("resources".to_string(), vec![]),
                ]
                .into_iter()
                .collect(),
                file_mappings: [
                    (ComponentType::Code, vec!["src".to_string()]),
                    (
                        ComponentType::Documentation,
                        vec!["docs".to_string(), ".".to_string()],
                    ),
                    (ComponentType::Config, vec![".".to_string()]),
                    (ComponentType::Resource, vec!["resources".to_string()]),
                    (ComponentType::Test, vec!["tests".to_string()]),
                    (ComponentType::Build, vec![".".to_string()]),
                ]
                .into_iter()
                .collect(),
                required_files: vec!["README.md".into()],
            },
        }
    }

    /// Permitted directory prefixes for a component type.
    pub fn permitted_dirs(&self, component_type: ComponentType) -> &[String] {
        self.file_mappings
            .get(&component_type)
            .map(|dirs| dirs.as_slice())
            .unwrap_or(&[])
    }
}

/// Counts of validation messages by level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub has_errors: bool,
}

impl ValidationSummary {
    pub fn from_messages(messages: &[ValidationMessage]) -> Self {
        let error_count = messages
            .iter()
            .filter(|m| m.level == ValidationLevel::Error)
            .count();
        Self {
            error_count,
            warning_count: messages
                .iter()
                .filter(|m| m.level == ValidationLevel::Warning)
                .count(),
            info_count: messages
                .iter()
                .filter(|m| m.level == ValidationLevel::Info)
                .count(),
            has_errors: error_count > 0,
        }
    }
}

/// Condensed view of a compilation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationSummary {
    pub project_name: String,
    pub project_type: ProjectType,
    pub output_dir: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub component_count: usize,
    pub component_types: BTreeMap<String, usize>,
    pub validation: ValidationSummary,
}

/// The outcome of materializing a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationResult {
    pub id: Uuid,
    pub project_name: String,
    pub project_type: ProjectType,
    pub output_dir: PathBuf,
    pub artifacts: Vec<Artifact>,
    pub validation_messages: Vec<ValidationMessage>,
    pub files_written: usize,
    pub timestamp: DateTime<Utc>,
    /// True iff no ERROR-level validation message was produced
    pub success: bool,
}

impl CompilationResult {
    pub fn summary(&self) -> CompilationSummary {
        let mut component_types = BTreeMap::new();
        for artifact in &self.artifacts {
            *component_types
                .entry(artifact.component_type.as_str().to_string())
                .or_insert(0) += 1;
        }
        CompilationSummary {
            project_name: self.project_name.clone(),
            project_type: self.project_type,
            output_dir: self.output_dir.clone(),
            timestamp: self.timestamp,
            success: self.success,
            component_count: self.artifacts.len(),
            component_types,
            validation: ValidationSummary::from_messages(&self.validation_messages),
        }
    }
}
