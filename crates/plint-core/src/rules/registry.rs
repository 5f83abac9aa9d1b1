use crate::model::project::ProjectModel;
use crate::policy::PolicyTable;
use crate::report::model::Finding;

use crate::rules::{actions, consistency, php};

/// A named, stateless unit of policy.
///
/// Rules never mutate the model, never share state, and never depend on
/// the evaluation order of other rules. A rule whose required input is
/// absent (e.g. no manifest) returns no findings; that is not an error.
pub trait Rule: Send + Sync {
    fn id(&self) -> &'static str;
    fn evaluate(&self, model: &ProjectModel, policy: &PolicyTable) -> Vec<Finding>;
}

/// Ordered rule collection. Registration order is the canonical execution
/// order and the tie-break for findings at the same location.
pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
}

impl Registry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn all(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }
}

impl Default for Registry {
    /// The full built-in rule set, in canonical order.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(actions::DeprecatedAction));
        registry.register(Box::new(php::PhpMatrixCompleteness));
        registry.register(Box::new(consistency::PhpstanVersionConsistency));
        registry.register(Box::new(php::PhpMatrixDeprecated));
        registry.register(Box::new(php::PhpMatrixUnstable));
        registry.register(Box::new(actions::ActionVersionPin));
        registry.register(Box::new(actions::WorkflowTriggerOverlap));
        registry.register(Box::new(actions::RunnerVersion));
        registry.register(Box::new(php::ManifestPhpRequirement));
        registry.register(Box::new(php::ManifestDevTools));
        registry.register(Box::new(consistency::VendoredToolUnused));
        registry
    }
}
