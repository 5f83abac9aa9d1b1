//! Cross-file rules: facts from the manifest correlated with facts from
//! workflows. These only work because both sides come from the same
//! fully-built, read-only model; no rule ever re-reads a file.

use std::collections::BTreeSet;

use crate::model::project::ProjectModel;
use crate::policy::PolicyTable;
use crate::report::model::{Finding, Location};
use crate::rules::registry::Rule;
use crate::util::version::{lower_bound, normalize_version, same_version};

/// The static analyzer version configured in CI must agree with the
/// manifest's constraint for the analyzer package.
///
/// Applies only when the manifest carries the constraint and at least one
/// workflow step invokes the analyzer action. An absent `version` input
/// means CI silently tracks the action's default, which drifts from the
/// vendored tool; that is an error. An explicit but different version is
/// a warning. A version pinned in the analyzer's own config file is held
/// to the same constraint.
pub struct PhpstanVersionConsistency;

impl Rule for PhpstanVersionConsistency {
    fn id(&self) -> &'static str {
        "phpstan-version-consistency"
    }

    fn evaluate(&self, model: &ProjectModel, policy: &PolicyTable) -> Vec<Finding> {
        let Some(manifest) = &model.manifest else {
            return Vec::new();
        };

        let mut findings = Vec::new();
        // One diagnostic per unparseable constraint, however many steps
        // reference the analyzer.
        let mut reported_bad_constraints: BTreeSet<&str> = BTreeSet::new();

        for workflow in &model.workflows {
            for job in &workflow.jobs {
                for step in &job.steps {
                    let Some(action) = step.action() else { continue };
                    let Some(package) = policy.analyzer_actions.get(&action.name) else {
                        continue;
                    };
                    let Some(constraint) = manifest.constraint(package) else {
                        continue;
                    };

                    let manifest_version = match lower_bound(constraint) {
                        Ok(version) => version,
                        Err(err) => {
                            if reported_bad_constraints.insert(package.as_str()) {
                                findings.push(Finding::input_parse_failure(
                                    self.id(),
                                    Location::with_pointer(
                                        &manifest.source_path,
                                        format!("require-dev.{package}"),
                                    ),
                                    err.to_string(),
                                ));
                            }
                            continue;
                        }
                    };

                    match action.with.get("version") {
                        None => findings.push(Finding::error(
                            self.id(),
                            Location::with_pointer(
                                &workflow.source_path,
                                format!("{}.with", step.pointer),
                            ),
                            format!(
                                "{} version is not pinned; pin it to {manifest_version} \
                                 to match the {package} constraint `{constraint}`",
                                action.name
                            ),
                        )),
                        Some(configured) => {
                            let configured_norm = normalize_version(configured);
                            if !same_version(&configured_norm, &manifest_version) {
                                findings.push(Finding::warning(
                                    self.id(),
                                    Location::with_pointer(
                                        &workflow.source_path,
                                        format!("{}.with.version", step.pointer),
                                    ),
                                    format!(
                                        "{} version {configured} does not match the \
                                         {package} constraint `{constraint}` \
                                         (expected {manifest_version})",
                                        action.name
                                    ),
                                ));
                            }
                        }
                    }
                }
            }
        }

        for (tool, package) in &policy.analyzer_tools {
            let Some(config) = model.tool_configs.get(tool) else {
                continue;
            };
            let Some(pinned) = config.pinned_version() else {
                continue;
            };
            let Some(constraint) = manifest.constraint(package) else {
                continue;
            };

            let manifest_version = match lower_bound(constraint) {
                Ok(version) => version,
                Err(err) => {
                    if reported_bad_constraints.insert(package.as_str()) {
                        findings.push(Finding::input_parse_failure(
                            self.id(),
                            Location::with_pointer(
                                &manifest.source_path,
                                format!("require-dev.{package}"),
                            ),
                            err.to_string(),
                        ));
                    }
                    continue;
                }
            };

            if !same_version(&normalize_version(&pinned), &manifest_version) {
                findings.push(Finding::warning(
                    self.id(),
                    Location::with_pointer(&config.source_path, "version"),
                    format!(
                        "{tool} config pins version {pinned}, which does not match \
                         the {package} constraint `{constraint}` \
                         (expected {manifest_version})"
                    ),
                ));
            }
        }
        findings
    }
}

/// Every `require-dev` package ships a binary; if that binary never shows
/// up in a workflow `run:` step the tool is vendored for nothing.
pub struct VendoredToolUnused;

impl Rule for VendoredToolUnused {
    fn id(&self) -> &'static str {
        "vendored-tool-unused"
    }

    fn evaluate(&self, model: &ProjectModel, _policy: &PolicyTable) -> Vec<Finding> {
        let Some(manifest) = &model.manifest else {
            return Vec::new();
        };
        if model.workflows.is_empty() {
            return Vec::new();
        }

        let mut findings = Vec::new();
        for tool in manifest.requires_dev.keys() {
            let binary = tool.rsplit('/').next().unwrap_or(tool);

            let used = model.workflows.iter().any(|workflow| {
                workflow.jobs.iter().any(|job| {
                    job.steps
                        .iter()
                        .filter_map(|step| step.run_command())
                        .any(|command| command.contains(binary))
                })
            });

            if !used {
                findings.push(Finding::warning(
                    self.id(),
                    Location::with_pointer(
                        &manifest.source_path,
                        format!("require-dev.{tool}"),
                    ),
                    format!("{binary} is vendored but not used in any workflow"),
                ));
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::parse::{DiscoveredFile, FileFormat};
    use crate::model::build;
    use crate::policy;
    use crate::report::model::{FindingKind, Severity};

    fn model_from(workflow: &str, manifest: &str) -> ProjectModel {
        let files = vec![
            DiscoveredFile::new("ci.yml", FileFormat::Workflow, workflow.as_bytes()),
            DiscoveredFile::new("composer.json", FileFormat::Manifest, manifest.as_bytes()),
        ];
        let (model, errors) = build::build(&files);
        assert!(errors.is_empty(), "fixtures should parse: {errors:?}");
        model
    }

    fn analyzer_workflow(version_input: Option<&str>) -> String {
        match version_input {
            Some(v) => format!(
                "jobs:\n  analyse:\n    steps:\n      - uses: php-actions/phpstan@v3\n        with:\n          version: \"{v}\"\n"
            ),
            None => "jobs:\n  analyse:\n    steps:\n      - uses: php-actions/phpstan@v3\n"
                .to_string(),
        }
    }

    const PHPSTAN_MANIFEST: &str = r#"{"require-dev": {"phpstan/phpstan": "^1.4"}}"#;

    fn model_with_config(neon: &str, manifest: &str) -> ProjectModel {
        let files = vec![
            DiscoveredFile::new(
                "phpstan.neon",
                FileFormat::ToolConfig {
                    tool: "phpstan".to_string(),
                },
                neon.as_bytes(),
            ),
            DiscoveredFile::new("composer.json", FileFormat::Manifest, manifest.as_bytes()),
        ];
        let (model, errors) = build::build(&files);
        assert!(errors.is_empty(), "fixtures should parse: {errors:?}");
        model
    }

    #[test]
    fn version_mismatch_is_a_warning() {
        let model = model_from(&analyzer_workflow(Some("1.2")), PHPSTAN_MANIFEST);
        let findings = PhpstanVersionConsistency.evaluate(&model, &policy::load());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("1.2"));
        assert!(findings[0].message.contains("1.4"));
    }

    #[test]
    fn missing_version_input_is_an_error() {
        let model = model_from(&analyzer_workflow(None), PHPSTAN_MANIFEST);
        let findings = PhpstanVersionConsistency.evaluate(&model, &policy::load());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].message.contains("pin it to 1.4"));
    }

    #[test]
    fn matching_version_yields_no_findings() {
        let model = model_from(&analyzer_workflow(Some("1.4")), PHPSTAN_MANIFEST);
        assert!(
            PhpstanVersionConsistency
                .evaluate(&model, &policy::load())
                .is_empty()
        );
    }

    #[test]
    fn trailing_zero_versions_still_match() {
        let model = model_from(&analyzer_workflow(Some("1.4.0")), PHPSTAN_MANIFEST);
        assert!(
            PhpstanVersionConsistency
                .evaluate(&model, &policy::load())
                .is_empty()
        );
    }

    #[test]
    fn no_manifest_constraint_means_rule_does_not_apply() {
        let model = model_from(&analyzer_workflow(Some("1.2")), r#"{"require-dev": {}}"#);
        assert!(
            PhpstanVersionConsistency
                .evaluate(&model, &policy::load())
                .is_empty()
        );
    }

    #[test]
    fn no_analyzer_step_means_rule_does_not_apply() {
        let model = model_from(
            "jobs:\n  t:\n    steps:\n      - run: composer install\n",
            PHPSTAN_MANIFEST,
        );
        assert!(
            PhpstanVersionConsistency
                .evaluate(&model, &policy::load())
                .is_empty()
        );
    }

    #[test]
    fn unparseable_constraint_is_one_parse_failure_diagnostic() {
        let manifest = r#"{"require-dev": {"phpstan/phpstan": "^1.4 || ^2.0"}}"#;
        // Two analyzer steps, still exactly one diagnostic.
        let workflow = "jobs:\n  a:\n    steps:\n      - uses: php-actions/phpstan@v3\n  b:\n    steps:\n      - uses: php-actions/phpstan@v3\n";
        let model = model_from(workflow, manifest);

        let findings = PhpstanVersionConsistency.evaluate(&model, &policy::load());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].kind, FindingKind::ParseError);
    }

    #[test]
    fn config_pin_mismatch_is_a_warning() {
        let model = model_with_config(
            "parameters:\n  version: \"1.2\"\n",
            PHPSTAN_MANIFEST,
        );
        let findings = PhpstanVersionConsistency.evaluate(&model, &policy::load());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("1.2"));
        assert_eq!(
            findings[0].location.path,
            std::path::PathBuf::from("phpstan.neon")
        );
        assert_eq!(findings[0].location.pointer.as_deref(), Some("version"));
    }

    #[test]
    fn config_pin_matching_constraint_is_silent() {
        let model = model_with_config(
            "parameters:\n  version: \"1.4.0\"\n",
            PHPSTAN_MANIFEST,
        );
        assert!(
            PhpstanVersionConsistency
                .evaluate(&model, &policy::load())
                .is_empty()
        );
    }

    #[test]
    fn config_without_pin_is_silent() {
        let model = model_with_config("parameters:\n  level: 8\n", PHPSTAN_MANIFEST);
        assert!(
            PhpstanVersionConsistency
                .evaluate(&model, &policy::load())
                .is_empty()
        );
    }

    #[test]
    fn constraint_found_in_require_as_fallback() {
        let manifest = r#"{"require": {"phpstan/phpstan": "^1.4"}}"#;
        let model = model_from(&analyzer_workflow(None), manifest);
        let findings = PhpstanVersionConsistency.evaluate(&model, &policy::load());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn unused_vendored_tool_warns() {
        let model = model_from(
            "jobs:\n  t:\n    steps:\n      - run: composer install\n",
            r#"{"require-dev": {"phpstan/phpstan": "^1.12"}}"#,
        );
        let findings = VendoredToolUnused.evaluate(&model, &policy::load());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("phpstan is vendored"));
        assert_eq!(
            findings[0].location.pointer.as_deref(),
            Some("require-dev.phpstan/phpstan")
        );
    }

    #[test]
    fn tool_used_in_run_step_is_silent() {
        let model = model_from(
            "jobs:\n  t:\n    steps:\n      - run: vendor/bin/phpstan analyse\n",
            r#"{"require-dev": {"phpstan/phpstan": "^1.12"}}"#,
        );
        assert!(VendoredToolUnused.evaluate(&model, &policy::load()).is_empty());
    }

    #[test]
    fn vendored_tool_rule_needs_workflows() {
        let files = vec![DiscoveredFile::new(
            "composer.json",
            FileFormat::Manifest,
            br#"{"require-dev": {"phpstan/phpstan": "^1.12"}}"#.to_vec(),
        )];
        let (model, _) = build::build(&files);
        assert!(VendoredToolUnused.evaluate(&model, &policy::load()).is_empty());
    }
}
