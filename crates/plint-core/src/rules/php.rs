//! PHP ecosystem rules: matrix coverage and manifest hygiene.

use crate::model::project::{Job, ProjectModel};
use crate::policy::PolicyTable;
use crate::report::model::{Finding, Location};
use crate::rules::registry::Rule;
use crate::util::version::{normalize_version, same_version};

const PHP: &str = "php";

fn php_axis(job: &Job) -> Option<Vec<String>> {
    let axis = job.matrix.as_ref()?.axis(PHP)?;
    Some(axis.iter().map(|v| normalize_version(v)).collect())
}

/// Jobs that declare a `php` matrix axis must cover every currently
/// supported PHP version. Jobs without the axis are not inspected.
pub struct PhpMatrixCompleteness;

impl Rule for PhpMatrixCompleteness {
    fn id(&self) -> &'static str {
        "php-matrix-completeness"
    }

    fn evaluate(&self, model: &ProjectModel, policy: &PolicyTable) -> Vec<Finding> {
        let Some(supported) = policy.supported_versions.get(PHP) else {
            return Vec::new();
        };

        let mut findings = Vec::new();
        for workflow in &model.workflows {
            for job in &workflow.jobs {
                let Some(declared) = php_axis(job) else { continue };
                for version in supported {
                    if declared.iter().any(|d| same_version(d, version)) {
                        continue;
                    }
                    findings.push(Finding::error(
                        self.id(),
                        Location::with_pointer(
                            &workflow.source_path,
                            format!("jobs.{}.strategy.matrix.php", job.name),
                        ),
                        format!("PHP {version} is not tested in job `{}`", job.name),
                    ));
                }
            }
        }
        findings
    }
}

/// End-of-life PHP versions must not remain on the test matrix.
pub struct PhpMatrixDeprecated;

impl Rule for PhpMatrixDeprecated {
    fn id(&self) -> &'static str {
        "php-matrix-deprecated"
    }

    fn evaluate(&self, model: &ProjectModel, policy: &PolicyTable) -> Vec<Finding> {
        let Some(deprecated) = policy.deprecated_version_prefixes.get(PHP) else {
            return Vec::new();
        };

        let mut findings = Vec::new();
        for workflow in &model.workflows {
            for job in &workflow.jobs {
                let Some(declared) = php_axis(job) else { continue };
                for version in &declared {
                    if deprecated.iter().any(|prefix| version.starts_with(prefix)) {
                        findings.push(Finding::error(
                            self.id(),
                            Location::with_pointer(
                                &workflow.source_path,
                                format!("jobs.{}.strategy.matrix.php", job.name),
                            ),
                            format!("PHP {version} is deprecated"),
                        ));
                    }
                }
            }
        }
        findings
    }
}

/// Upcoming PHP versions are worth testing before they go stable.
pub struct PhpMatrixUnstable;

impl Rule for PhpMatrixUnstable {
    fn id(&self) -> &'static str {
        "php-matrix-unstable"
    }

    fn evaluate(&self, model: &ProjectModel, policy: &PolicyTable) -> Vec<Finding> {
        let Some(unstable) = policy.unstable_versions.get(PHP) else {
            return Vec::new();
        };

        let mut findings = Vec::new();
        for workflow in &model.workflows {
            for job in &workflow.jobs {
                let Some(declared) = php_axis(job) else { continue };
                for version in unstable {
                    if declared.iter().any(|d| same_version(d, version)) {
                        continue;
                    }
                    findings.push(Finding::warning(
                        self.id(),
                        Location::with_pointer(
                            &workflow.source_path,
                            format!("jobs.{}.strategy.matrix.php", job.name),
                        ),
                        format!("PHP {version} is not tested yet in job `{}`", job.name),
                    ));
                }
            }
        }
        findings
    }
}

/// The manifest should require PHP, anchored at the oldest supported
/// version so the declared floor matches what CI actually tests.
pub struct ManifestPhpRequirement;

impl Rule for ManifestPhpRequirement {
    fn id(&self) -> &'static str {
        "manifest-php-requirement"
    }

    fn evaluate(&self, model: &ProjectModel, policy: &PolicyTable) -> Vec<Finding> {
        let Some(manifest) = &model.manifest else {
            return Vec::new();
        };
        let Some(oldest) = policy.oldest_supported(PHP) else {
            return Vec::new();
        };

        let location = |pointer: Option<&str>| match pointer {
            Some(p) => Location::with_pointer(&manifest.source_path, p),
            None => Location::file(&manifest.source_path),
        };

        if manifest.requires.is_empty() {
            return vec![Finding::warning(
                self.id(),
                location(None),
                "no dependencies are required, should at least require php",
            )];
        }

        let Some(constraint) = manifest.requires.get(PHP) else {
            return vec![Finding::warning(
                self.id(),
                location(Some("require")),
                "PHP should be required",
            )];
        };

        let expected = format!("^{oldest}");
        if constraint != &expected {
            return vec![Finding::warning(
                self.id(),
                location(Some("require.php")),
                format!("php requirement should be {expected}, is {constraint}"),
            )];
        }

        Vec::new()
    }
}

/// Dev tooling should be present and at the constraint the policy pins.
pub struct ManifestDevTools;

impl Rule for ManifestDevTools {
    fn id(&self) -> &'static str {
        "manifest-dev-tools"
    }

    fn evaluate(&self, model: &ProjectModel, policy: &PolicyTable) -> Vec<Finding> {
        let Some(manifest) = &model.manifest else {
            return Vec::new();
        };

        if manifest.requires_dev.is_empty() {
            return vec![Finding::warning(
                self.id(),
                Location::file(&manifest.source_path),
                "no dev dependencies are required, should at least require phpunit",
            )];
        }

        let mut findings = Vec::new();
        for (tool, expected) in &policy.required_dev_tools {
            match manifest.requires_dev.get(tool) {
                None => findings.push(Finding::warning(
                    self.id(),
                    Location::with_pointer(&manifest.source_path, "require-dev"),
                    format!("{tool} should be required"),
                )),
                Some(constraint) if constraint != expected => {
                    findings.push(Finding::warning(
                        self.id(),
                        Location::with_pointer(
                            &manifest.source_path,
                            format!("require-dev.{tool}"),
                        ),
                        format!("{tool} should be {expected}, is {constraint}"),
                    ));
                }
                Some(_) => {}
            }
        }
        findings
    }
}
