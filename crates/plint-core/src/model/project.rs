use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root aggregate for one scanned project directory.
///
/// Immutable once built; rules read it, never mutate it. Workflow order is
/// discovery order, which feeds into deterministic finding output.
#[derive(Debug, Clone, Default)]
pub struct ProjectModel {
    pub workflows: Vec<Workflow>,
    pub manifest: Option<DependencyManifest>,
    pub tool_configs: BTreeMap<String, ToolConfig>,
}

/// One CI workflow definition.
#[derive(Debug, Clone)]
pub struct Workflow {
    pub source_path: PathBuf,
    pub triggers: Option<Triggers>,
    pub jobs: Vec<Job>,
}

/// Normalized `on:` block. String and list forms are folded into the map
/// form so rules only see one shape.
#[derive(Debug, Clone, Default)]
pub struct Triggers {
    pub events: BTreeMap<String, TriggerConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct TriggerConfig {
    pub has_branch_filter: bool,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub runs_on: Option<String>,
    pub matrix: Option<Matrix>,
    pub steps: Vec<Step>,
}

/// Declared matrix axes, stored unexpanded. Rules reason about axis
/// coverage, never about instantiated jobs.
#[derive(Debug, Clone, Default)]
pub struct Matrix {
    pub axes: BTreeMap<String, Vec<String>>,
}

impl Matrix {
    pub fn axis(&self, name: &str) -> Option<&[String]> {
        self.axes.get(name).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone)]
pub struct Step {
    /// Dotted pointer to this step within its workflow document,
    /// e.g. `jobs.test.steps[2]`.
    pub pointer: String,
    pub kind: StepKind,
}

/// A step either references a reusable action or runs an inline command.
#[derive(Debug, Clone)]
pub enum StepKind {
    Uses(ActionRef),
    Run(String),
}

impl Step {
    pub fn action(&self) -> Option<&ActionRef> {
        match &self.kind {
            StepKind::Uses(action) => Some(action),
            StepKind::Run(_) => None,
        }
    }

    pub fn run_command(&self) -> Option<&str> {
        match &self.kind {
            StepKind::Uses(_) => None,
            StepKind::Run(cmd) => Some(cmd),
        }
    }
}

/// Reference to a reusable CI action: `owner/repo` name, optional `@ref`
/// version pin and the step's `with:` inputs (scalars, stringified).
#[derive(Debug, Clone)]
pub struct ActionRef {
    pub name: String,
    pub version_ref: Option<String>,
    pub with: BTreeMap<String, String>,
}

impl ActionRef {
    /// The full `name@ref` form as written in the workflow, or just the
    /// name when no version ref is pinned.
    pub fn qualified(&self) -> String {
        match &self.version_ref {
            Some(v) => format!("{}@{}", self.name, v),
            None => self.name.clone(),
        }
    }
}

/// Parsed dependency manifest (`require` / `require-dev` subset).
#[derive(Debug, Clone)]
pub struct DependencyManifest {
    pub source_path: PathBuf,
    pub requires: BTreeMap<String, String>,
    pub requires_dev: BTreeMap<String, String>,
}

impl DependencyManifest {
    /// Look a package up in `require-dev` first, then `require`.
    pub fn constraint(&self, package: &str) -> Option<&str> {
        self.requires_dev
            .get(package)
            .or_else(|| self.requires.get(package))
            .map(String::as_str)
    }
}

/// Opaque configuration of an external tool, plus its kind tag.
/// Unrecognized kinds are retained but no rule inspects them.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub tool_kind: String,
    pub source_path: PathBuf,
    pub value: serde_yaml::Value,
}

impl ToolConfig {
    /// Extract a pinned version number if the config declares one, checking
    /// a top-level `version` key and then `parameters.version`.
    pub fn pinned_version(&self) -> Option<String> {
        let direct = self.value.get("version");
        let nested = self
            .value
            .get("parameters")
            .and_then(|p| p.get("version"));
        direct.or(nested).and_then(scalar_string)
    }
}

fn scalar_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
