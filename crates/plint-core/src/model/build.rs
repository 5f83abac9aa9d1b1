//! Maps generic parsed documents into the typed project model.
//!
//! This is the only place allowed to interpret raw document shape.
//! Extraction is total: missing optional keys are treated as absent, and a
//! malformed file contributes one `ParseError` without aborting the build.

use log::debug;
use serde_yaml::Value as Yaml;
use std::collections::BTreeMap;
use std::path::Path;

use crate::docs::parse::{self, DiscoveredFile, ParseError, RawDocument};
use crate::model::project::{
    ActionRef, DependencyManifest, Job, Matrix, ProjectModel, Step, StepKind, ToolConfig,
    TriggerConfig, Triggers, Workflow,
};

/// Build a project model from the discovered files, best-effort.
///
/// Files that fail to parse (or whose top-level shape is unusable) are
/// recorded in the returned error list and excluded from the model; every
/// other file still contributes its facts.
pub fn build(files: &[DiscoveredFile]) -> (ProjectModel, Vec<ParseError>) {
    let mut model = ProjectModel::default();
    let mut errors = Vec::new();

    for file in files {
        match parse::parse(file) {
            Ok(RawDocument::Workflow(value)) => match extract_workflow(&file.path, &value) {
                Ok(workflow) => model.workflows.push(workflow),
                Err(err) => errors.push(err),
            },
            Ok(RawDocument::Manifest(value)) => match extract_manifest(&file.path, &value) {
                Ok(manifest) => {
                    if model.manifest.is_some() {
                        debug!(
                            "ignoring additional manifest {}, model already has one",
                            file.path.display()
                        );
                    } else {
                        model.manifest = Some(manifest);
                    }
                }
                Err(err) => errors.push(err),
            },
            Ok(RawDocument::ToolConfig { tool, value }) => {
                let config = ToolConfig {
                    tool_kind: tool_kind(&tool).to_string(),
                    source_path: file.path.clone(),
                    value,
                };
                model.tool_configs.entry(tool).or_insert(config);
            }
            Err(err) => {
                debug!("excluding {} from model: {}", err.path.display(), err.reason);
                errors.push(err);
            }
        }
    }

    (model, errors)
}

/// Kind tag for a configured tool. Unknown tools stay in the model with an
/// `unknown` kind and no rule inspects them.
fn tool_kind(tool: &str) -> &'static str {
    match tool {
        "phpstan" => "static-analyzer",
        _ => "unknown",
    }
}

fn extract_workflow(path: &Path, value: &Yaml) -> Result<Workflow, ParseError> {
    let root = value.as_mapping().ok_or_else(|| ParseError {
        path: path.to_path_buf(),
        reason: "workflow document root is not a mapping".to_string(),
    })?;

    let triggers = workflow_on(root).map(extract_triggers);

    let mut jobs = Vec::new();
    if let Some(jobs_value) = value.get("jobs") {
        let jobs_map = jobs_value.as_mapping().ok_or_else(|| ParseError {
            path: path.to_path_buf(),
            reason: "workflow `jobs` is not a mapping".to_string(),
        })?;
        for (name, job) in jobs_map {
            let Some(name) = name.as_str() else { continue };
            jobs.push(extract_job(name, job));
        }
    }

    Ok(Workflow {
        source_path: path.to_path_buf(),
        triggers,
        jobs,
    })
}

/// Find the `on:` block. YAML 1.1 resolves a bare `on` key to boolean
/// `true`, so both spellings must be checked.
fn workflow_on(root: &serde_yaml::Mapping) -> Option<&Yaml> {
    root.iter()
        .find(|(key, _)| matches!(key, Yaml::Bool(true)) || key.as_str() == Some("on"))
        .map(|(_, value)| value)
}

/// Normalize the `on:` block: the string and list shorthands become the
/// mapping form with empty per-event configs.
fn extract_triggers(value: &Yaml) -> Triggers {
    let mut events = BTreeMap::new();
    match value {
        Yaml::String(s) => {
            for event in s.split(',') {
                events.insert(event.trim().to_string(), TriggerConfig::default());
            }
        }
        Yaml::Sequence(seq) => {
            for item in seq {
                if let Some(event) = item.as_str() {
                    events.insert(event.trim().to_string(), TriggerConfig::default());
                }
            }
        }
        Yaml::Mapping(map) => {
            for (event, config) in map {
                let Some(event) = event.as_str() else { continue };
                let has_branch_filter = config.get("branches").is_some();
                events.insert(event.to_string(), TriggerConfig { has_branch_filter });
            }
        }
        _ => {}
    }
    Triggers { events }
}

fn extract_job(name: &str, job: &Yaml) -> Job {
    let runs_on = job.get("runs-on").and_then(scalar_string);

    let matrix = job
        .get("strategy")
        .and_then(|s| s.get("matrix"))
        .and_then(Yaml::as_mapping)
        .map(extract_matrix);

    let mut steps = Vec::new();
    if let Some(step_seq) = job.get("steps").and_then(Yaml::as_sequence) {
        for (n, step) in step_seq.iter().enumerate() {
            let pointer = format!("jobs.{name}.steps[{n}]");
            if let Some(step) = extract_step(pointer, step) {
                steps.push(step);
            }
        }
    }

    Job {
        name: name.to_string(),
        runs_on,
        matrix,
        steps,
    }
}

fn extract_matrix(map: &serde_yaml::Mapping) -> Matrix {
    let mut axes = BTreeMap::new();
    for (axis, values) in map {
        let Some(axis) = axis.as_str() else { continue };
        // `include`/`exclude` refine the cross product; they are not axes.
        let Some(seq) = values.as_sequence() else { continue };
        let values: Vec<String> = seq.iter().filter_map(scalar_string).collect();
        axes.insert(axis.to_string(), values);
    }
    Matrix { axes }
}

fn extract_step(pointer: String, step: &Yaml) -> Option<Step> {
    if let Some(uses) = step.get("uses").and_then(Yaml::as_str) {
        let (name, version_ref) = match uses.split_once('@') {
            Some((name, version)) => (name.to_string(), Some(version.to_string())),
            None => (uses.to_string(), None),
        };

        let mut with = BTreeMap::new();
        if let Some(inputs) = step.get("with").and_then(Yaml::as_mapping) {
            for (key, value) in inputs {
                let (Some(key), Some(value)) = (key.as_str(), scalar_string(value)) else {
                    continue;
                };
                with.insert(key.to_string(), value);
            }
        }

        return Some(Step {
            pointer,
            kind: StepKind::Uses(ActionRef {
                name,
                version_ref,
                with,
            }),
        });
    }

    if let Some(run) = step.get("run").and_then(Yaml::as_str) {
        return Some(Step {
            pointer,
            kind: StepKind::Run(run.to_string()),
        });
    }

    None
}

fn extract_manifest(path: &Path, value: &serde_json::Value) -> Result<DependencyManifest, ParseError> {
    if !value.is_object() {
        return Err(ParseError {
            path: path.to_path_buf(),
            reason: "manifest document root is not an object".to_string(),
        });
    }

    Ok(DependencyManifest {
        source_path: path.to_path_buf(),
        requires: constraint_map(value.get("require")),
        requires_dev: constraint_map(value.get("require-dev")),
    })
}

fn constraint_map(value: Option<&serde_json::Value>) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    if let Some(obj) = value.and_then(serde_json::Value::as_object) {
        for (package, constraint) in obj {
            if let Some(constraint) = constraint.as_str() {
                map.insert(package.clone(), constraint.to_string());
            }
        }
    }
    map
}

fn scalar_string(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
