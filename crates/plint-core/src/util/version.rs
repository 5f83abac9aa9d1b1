//! Version-string handling shared by rules.
//!
//! Comparison convention: a constraint's comparison anchor is the numeric
//! value immediately following its operator (`^1.4` -> `1.4`,
//! `>=1.4,<2.0` -> `1.4`). Union constraints (`||`) have no single anchor
//! and are rejected rather than guessed at.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("constraint `{0}` is a union; it has no single lower bound")]
    AmbiguousUnion(String),
    #[error("constraint `{0}` has no leading numeric version")]
    NoNumericAnchor(String),
}

/// Normalize a matrix or input version value: trim whitespace and quoting
/// variants, strip a leading `php` prefix (`php8.2` -> `8.2`).
pub fn normalize_version(raw: &str) -> String {
    let s = raw.trim();
    let s = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(s);
    let s = s.strip_prefix("php").unwrap_or(s);
    s.trim_start_matches('-').trim().to_string()
}

/// Extract the lower bound of a version constraint.
///
/// Takes the first clause of a comma/space separated range and reads the
/// dotted numeric version after its operator.
pub fn lower_bound(constraint: &str) -> Result<String, ConstraintError> {
    let trimmed = constraint.trim();
    if trimmed.contains("||") || trimmed.contains('|') {
        return Err(ConstraintError::AmbiguousUnion(trimmed.to_string()));
    }

    let first_clause = trimmed
        .split([',', ' '])
        .find(|clause| !clause.is_empty())
        .unwrap_or("");

    let anchor: String = first_clause
        .trim_start_matches(['^', '~', '>', '<', '=', 'v'])
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if anchor.is_empty() || components(&anchor).is_none() {
        return Err(ConstraintError::NoNumericAnchor(trimmed.to_string()));
    }
    Ok(anchor)
}

/// Exact version equality, insensitive to trailing zero components
/// (`1.4` == `1.4.0`). Non-numeric versions fall back to string equality.
pub fn same_version(a: &str, b: &str) -> bool {
    match (components(a), components(b)) {
        (Some(mut ca), Some(mut cb)) => {
            while ca.last() == Some(&0) {
                ca.pop();
            }
            while cb.last() == Some(&0) {
                cb.pop();
            }
            ca == cb
        }
        _ => a == b,
    }
}

fn components(version: &str) -> Option<Vec<u64>> {
    if version.is_empty() {
        return None;
    }
    version.split('.').map(|part| part.parse().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_php_prefix_and_quotes() {
        assert_eq!(normalize_version("php8.2"), "8.2");
        assert_eq!(normalize_version("\"8.2\""), "8.2");
        assert_eq!(normalize_version("'7.4'"), "7.4");
        assert_eq!(normalize_version(" 8.3 "), "8.3");
        assert_eq!(normalize_version("php-8.1"), "8.1");
    }

    #[test]
    fn lower_bound_of_caret_constraint() {
        assert_eq!(lower_bound("^1.4").unwrap(), "1.4");
        assert_eq!(lower_bound("^11.0").unwrap(), "11.0");
    }

    #[test]
    fn lower_bound_of_range_takes_first_clause() {
        assert_eq!(lower_bound(">=1.4,<2.0").unwrap(), "1.4");
        assert_eq!(lower_bound(">=1.4 <2.0").unwrap(), "1.4");
    }

    #[test]
    fn lower_bound_of_exact_pin() {
        assert_eq!(lower_bound("1.12.5").unwrap(), "1.12.5");
        assert_eq!(lower_bound("v2.1").unwrap(), "2.1");
    }

    #[test]
    fn union_constraint_is_ambiguous() {
        assert!(matches!(
            lower_bound("^1.4 || ^2.0"),
            Err(ConstraintError::AmbiguousUnion(_))
        ));
    }

    #[test]
    fn non_numeric_constraint_is_rejected() {
        assert!(matches!(
            lower_bound("dev-main"),
            Err(ConstraintError::NoNumericAnchor(_))
        ));
        assert!(matches!(
            lower_bound("*"),
            Err(ConstraintError::NoNumericAnchor(_))
        ));
    }

    #[test]
    fn same_version_ignores_trailing_zeros() {
        assert!(same_version("1.4", "1.4.0"));
        assert!(same_version("8", "8.0"));
        assert!(!same_version("1.4", "1.40"));
        assert!(!same_version("1.2", "1.4"));
    }

    #[test]
    fn same_version_falls_back_to_string_equality() {
        assert!(same_version("beta", "beta"));
        assert!(!same_version("beta", "1.0"));
    }
}
