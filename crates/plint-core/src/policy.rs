//! Embedded policy reference data.
//!
//! This table encodes the opinionated standards the rules enforce. It is
//! compiled in, constructed once per run, and never derived from the
//! scanned project. Sources: https://www.php.net/supported-versions.php
//! and the action pins the team standardized on.

use std::collections::BTreeMap;

/// Static reference data consulted by rules. Read-only after `load()`.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    /// Ecosystem name -> currently supported versions, oldest first.
    pub supported_versions: BTreeMap<String, Vec<String>>,
    /// Ecosystem name -> upcoming versions worth testing early.
    pub unstable_versions: BTreeMap<String, Vec<String>>,
    /// Ecosystem name -> end-of-life version prefixes.
    pub deprecated_version_prefixes: BTreeMap<String, Vec<String>>,
    /// Full `name@ref` action spellings that are deprecated, mapped to
    /// their replacement. `None` means no replacement exists.
    pub deprecated_actions: BTreeMap<String, Option<String>>,
    /// Action name -> the version ref it must be pinned to.
    pub pinned_actions: BTreeMap<String, String>,
    /// Action name -> the manifest package whose version the action's
    /// `version` input must agree with.
    pub analyzer_actions: BTreeMap<String, String>,
    /// Tool-config name -> the manifest package a version pinned in that
    /// config must agree with.
    pub analyzer_tools: BTreeMap<String, String>,
    /// Dev-tool package -> the constraint current projects should carry.
    pub required_dev_tools: BTreeMap<String, String>,
    /// Runner label -> the pinned image to use instead.
    pub preferred_runners: BTreeMap<String, String>,
}

impl PolicyTable {
    /// Oldest currently-supported version for an ecosystem, used as the
    /// floor a manifest should require.
    pub fn oldest_supported(&self, ecosystem: &str) -> Option<&str> {
        self.supported_versions
            .get(ecosystem)?
            .first()
            .map(String::as_str)
    }
}

/// Construct the policy table. Pure, infallible: the data is embedded and
/// well-formed by construction.
pub fn load() -> PolicyTable {
    let owned = |pairs: &[(&str, &str)]| -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    };

    PolicyTable {
        supported_versions: BTreeMap::from([(
            "php".to_string(),
            vec!["8.2".to_string(), "8.3".to_string()],
        )]),
        unstable_versions: BTreeMap::from([("php".to_string(), vec!["8.4".to_string()])]),
        deprecated_version_prefixes: BTreeMap::from([(
            "php".to_string(),
            vec!["7".to_string(), "8.0".to_string(), "8.1".to_string()],
        )]),
        deprecated_actions: BTreeMap::from([
            (
                "actions/checkout@v2".to_string(),
                Some("actions/checkout@v4".to_string()),
            ),
            (
                "actions/cache@v2".to_string(),
                Some("actions/cache@v4".to_string()),
            ),
            (
                "actions/upload-artifact@v3".to_string(),
                Some("actions/upload-artifact@v4".to_string()),
            ),
            (
                "actions/download-artifact@v3".to_string(),
                Some("actions/download-artifact@v4".to_string()),
            ),
            // Archived upstream, nothing to migrate to.
            ("actions/create-release@v1".to_string(), None),
        ]),
        pinned_actions: owned(&[
            ("actions/checkout", "v4"),
            ("actions/cache", "v4"),
            ("php-actions/composer", "v6"),
            ("shivammathur/setup-php", "v2"),
        ]),
        analyzer_actions: owned(&[("php-actions/phpstan", "phpstan/phpstan")]),
        analyzer_tools: owned(&[("phpstan", "phpstan/phpstan")]),
        required_dev_tools: owned(&[
            ("phpunit/phpunit", "^11.0"),
            ("phpstan/phpstan", "^1.12"),
            ("friendsofphp/php-cs-fixer", "^3.64"),
        ]),
        preferred_runners: owned(&[("ubuntu-latest", "ubuntu-24.04")]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn php_supported_versions_are_ordered_oldest_first() {
        let policy = load();
        let php = &policy.supported_versions["php"];
        assert_eq!(php.first().map(String::as_str), Some("8.2"));
        assert_eq!(policy.oldest_supported("php"), Some("8.2"));
    }

    #[test]
    fn unknown_ecosystem_has_no_floor() {
        assert_eq!(load().oldest_supported("cobol"), None);
    }

    #[test]
    fn deprecated_action_may_lack_replacement() {
        let policy = load();
        assert_eq!(
            policy.deprecated_actions["actions/checkout@v2"].as_deref(),
            Some("actions/checkout@v4")
        );
        assert!(policy.deprecated_actions["actions/create-release@v1"].is_none());
    }

    #[test]
    fn load_is_deterministic() {
        let a = load();
        let b = load();
        assert_eq!(a.pinned_actions, b.pinned_actions);
        assert_eq!(a.supported_versions, b.supported_versions);
    }
}
