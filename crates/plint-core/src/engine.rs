//! Rule evaluation driver.
//!
//! Invokes every registered rule in registration order against the shared
//! read-only model. The central contract here is failure isolation: a rule
//! that panics becomes one diagnostic finding and the run continues.

use std::panic::{self, AssertUnwindSafe};

use log::debug;

use crate::model::project::ProjectModel;
use crate::policy::PolicyTable;
use crate::report::model::{Finding, FindingKind, Location, Severity};
use crate::rules::registry::Registry;
use crate::util::deterministic;

/// Evaluate all registered rules and return the deterministically sorted
/// findings. Output order is independent of registration and of any
/// parsing or evaluation concurrency.
pub fn evaluate(model: &ProjectModel, policy: &PolicyTable, registry: &Registry) -> Vec<Finding> {
    let mut findings = Vec::new();

    for rule in registry.all() {
        debug!("evaluating rule {}", rule.id());
        match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(model, policy))) {
            Ok(rule_findings) => findings.extend(rule_findings),
            Err(_) => {
                debug!("rule {} panicked, converting to finding", rule.id());
                findings.push(Finding {
                    rule_id: rule.id().to_string(),
                    severity: Severity::Warning,
                    kind: FindingKind::RuleCrash,
                    location: Location::file(""),
                    message: "rule crashed".to_string(),
                });
            }
        }
    }

    deterministic::sort_findings(&mut findings);

    // Identical findings collapse into one. The sort key is (path, line,
    // rule id), so equal findings are not necessarily adjacent; compare
    // against everything kept so far.
    let mut unique: Vec<Finding> = Vec::with_capacity(findings.len());
    for finding in findings {
        if !unique.contains(&finding) {
            unique.push(finding);
        }
    }
    unique
}
