use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::docs::parse::ParseError;

/// How serious a finding is. `Error` findings fail the run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "Warning"),
            Severity::Error => write!(f, "Error"),
        }
    }
}

/// Distinguishes ordinary policy findings from diagnostics the engine or a
/// rule produced about its own inability to evaluate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// A genuine policy violation.
    Policy,
    /// A rule could not interpret one of its inputs (e.g. a version
    /// constraint it does not understand).
    ParseError,
    /// A rule panicked; the engine converted the panic into this finding.
    RuleCrash,
}

/// Where in the project a finding points.
///
/// `pointer` is a dotted path within the document
/// (e.g. `jobs.test.strategy.matrix.php`), not a byte offset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub line: Option<u32>,
    pub pointer: Option<String>,
}

impl Location {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            line: None,
            pointer: None,
        }
    }

    pub fn with_pointer(path: impl Into<PathBuf>, pointer: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: None,
            pointer: Some(pointer.into()),
        }
    }
}

/// One reported issue. Pure data; carries no behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    pub rule_id: String,
    pub severity: Severity,
    pub kind: FindingKind,
    pub location: Location,
    pub message: String,
}

impl Finding {
    pub fn error(rule_id: &str, location: Location, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity: Severity::Error,
            kind: FindingKind::Policy,
            location,
            message: message.into(),
        }
    }

    pub fn warning(rule_id: &str, location: Location, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity: Severity::Warning,
            kind: FindingKind::Policy,
            location,
            message: message.into(),
        }
    }

    /// A rule's input could not be interpreted; surfaced as a warning so the
    /// run still completes.
    pub fn input_parse_failure(
        rule_id: &str,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity: Severity::Warning,
            kind: FindingKind::ParseError,
            location,
            message: message.into(),
        }
    }
}

/// Result of one `lint` invocation.
///
/// `parse_errors` lists files that were excluded from the model; their
/// absence never aborts the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintOutcome {
    pub findings: Vec<Finding>,
    pub parse_errors: Vec<ParseError>,
    pub has_error: bool,
}
