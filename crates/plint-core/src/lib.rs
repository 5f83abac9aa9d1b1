pub mod docs;
pub mod engine;
pub mod model;
pub mod policy;
pub mod report;
pub mod rules;
pub mod util;

use log::info;

use crate::docs::parse::DiscoveredFile;
use crate::report::model::{LintOutcome, Severity};
use crate::rules::registry::Registry;

pub const TOOL_NAME: &str = "plint";

/// Version of the built-in rule catalog and policy data.
pub const RULE_CATALOG_VERSION: &str = "0.1.0";

/// Lint a project from its discovered configuration files.
///
/// Pure with respect to the filesystem: the caller reads the bytes, the
/// core never does. Broken files are recorded in `parse_errors` and never
/// prevent the remaining files from being checked. `has_error` drives the
/// caller's exit status.
pub fn lint(files: &[DiscoveredFile]) -> LintOutcome {
    let (model, parse_errors) = model::build::build(files);
    info!(
        "model built: {} workflows, manifest: {}, {} parse errors",
        model.workflows.len(),
        model.manifest.is_some(),
        parse_errors.len()
    );

    let policy = policy::load();
    let registry = Registry::default();
    let findings = engine::evaluate(&model, &policy, &registry);

    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    LintOutcome {
        findings,
        parse_errors,
        has_error,
    }
}
