//! Rules about workflow structure and action usage.

use crate::model::project::ProjectModel;
use crate::policy::PolicyTable;
use crate::report::model::{Finding, Location};
use crate::rules::registry::Rule;

/// Flags every use of an action listed in the deprecation table.
/// Applies per occurrence: the same action used twice yields two findings.
pub struct DeprecatedAction;

impl Rule for DeprecatedAction {
    fn id(&self) -> &'static str {
        "deprecated-action"
    }

    fn evaluate(&self, model: &ProjectModel, policy: &PolicyTable) -> Vec<Finding> {
        let mut findings = Vec::new();
        for workflow in &model.workflows {
            for job in &workflow.jobs {
                for step in &job.steps {
                    let Some(action) = step.action() else { continue };
                    let qualified = action.qualified();
                    let Some(replacement) = policy.deprecated_actions.get(&qualified) else {
                        continue;
                    };
                    let message = match replacement {
                        Some(replacement) => {
                            format!("{qualified} is deprecated, use {replacement}")
                        }
                        None => format!("{qualified} is deprecated, no replacement available"),
                    };
                    findings.push(Finding::warning(
                        self.id(),
                        Location::with_pointer(
                            &workflow.source_path,
                            format!("{}.uses", step.pointer),
                        ),
                        message,
                    ));
                }
            }
        }
        findings
    }
}

/// Actions in the pin table must be used at exactly the pinned ref.
pub struct ActionVersionPin;

impl Rule for ActionVersionPin {
    fn id(&self) -> &'static str {
        "action-version-pin"
    }

    fn evaluate(&self, model: &ProjectModel, policy: &PolicyTable) -> Vec<Finding> {
        let mut findings = Vec::new();
        for workflow in &model.workflows {
            for job in &workflow.jobs {
                for step in &job.steps {
                    let Some(action) = step.action() else { continue };
                    let Some(pinned) = policy.pinned_actions.get(&action.name) else {
                        continue;
                    };
                    if action.version_ref.as_deref() == Some(pinned) {
                        continue;
                    }
                    let actual = action.version_ref.as_deref().unwrap_or("unpinned");
                    findings.push(Finding::error(
                        self.id(),
                        Location::with_pointer(
                            &workflow.source_path,
                            format!("{}.uses", step.pointer),
                        ),
                        format!("{} should be {pinned}, is {actual}", action.name),
                    ));
                }
            }
        }
        findings
    }
}

/// A workflow triggered by both `push` and `pull_request` runs twice per PR
/// unless `push` is restricted to branches.
pub struct WorkflowTriggerOverlap;

impl Rule for WorkflowTriggerOverlap {
    fn id(&self) -> &'static str {
        "workflow-trigger-overlap"
    }

    fn evaluate(&self, model: &ProjectModel, _policy: &PolicyTable) -> Vec<Finding> {
        let mut findings = Vec::new();
        for workflow in &model.workflows {
            let Some(triggers) = &workflow.triggers else { continue };
            let Some(push) = triggers.events.get("push") else { continue };
            if !triggers.events.contains_key("pull_request") {
                continue;
            }
            if !push.has_branch_filter {
                findings.push(Finding::error(
                    self.id(),
                    Location::with_pointer(&workflow.source_path, "on"),
                    "triggered by both push and pull_request; add a `branches` \
                     filter to push to avoid running twice",
                ));
            }
        }
        findings
    }
}

/// Floating runner labels resolve to different images over time; use the
/// pinned image from the policy table instead.
pub struct RunnerVersion;

impl Rule for RunnerVersion {
    fn id(&self) -> &'static str {
        "runner-version"
    }

    fn evaluate(&self, model: &ProjectModel, policy: &PolicyTable) -> Vec<Finding> {
        let mut findings = Vec::new();
        for workflow in &model.workflows {
            for job in &workflow.jobs {
                let Some(runs_on) = &job.runs_on else { continue };
                let Some(preferred) = policy.preferred_runners.get(runs_on) else {
                    continue;
                };
                findings.push(Finding::warning(
                    self.id(),
                    Location::with_pointer(
                        &workflow.source_path,
                        format!("jobs.{}.runs-on", job.name),
                    ),
                    format!("{runs_on} is not recommended, use {preferred}"),
                ));
            }
        }
        findings
    }
}
