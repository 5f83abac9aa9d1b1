//! Deterministic ordering of findings.
//!
//! Output order must not depend on filesystem enumeration, rule
//! registration, or any internal concurrency. Findings are sorted by
//! (file path, line, rule id); the sort is stable, so registration order
//! breaks the remaining ties.

use crate::report::model::Finding;

pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        (&a.location.path, a.location.line, &a.rule_id).cmp(&(
            &b.location.path,
            b.location.line,
            &b.rule_id,
        ))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{Finding, Location};

    fn finding(rule: &str, path: &str, line: Option<u32>) -> Finding {
        Finding::warning(
            rule,
            Location {
                path: path.into(),
                line,
                pointer: None,
            },
            "m",
        )
    }

    #[test]
    fn sorts_by_path_then_line_then_rule() {
        let mut findings = vec![
            finding("z-rule", "b.yml", None),
            finding("a-rule", "b.yml", None),
            finding("m-rule", "a.yml", Some(9)),
            finding("m-rule", "a.yml", Some(2)),
        ];
        sort_findings(&mut findings);

        let keys: Vec<(String, Option<u32>, String)> = findings
            .iter()
            .map(|f| {
                (
                    f.location.path.display().to_string(),
                    f.location.line,
                    f.rule_id.clone(),
                )
            })
            .collect();

        assert_eq!(
            keys,
            vec![
                ("a.yml".to_string(), Some(2), "m-rule".to_string()),
                ("a.yml".to_string(), Some(9), "m-rule".to_string()),
                ("b.yml".to_string(), None, "a-rule".to_string()),
                ("b.yml".to_string(), None, "z-rule".to_string()),
            ]
        );
    }

    #[test]
    fn stable_for_equal_keys() {
        let mut first = finding("same", "a.yml", None);
        first.message = "first".to_string();
        let mut second = finding("same", "a.yml", None);
        second.message = "second".to_string();

        let mut findings = vec![first, second];
        sort_findings(&mut findings);

        assert_eq!(findings[0].message, "first");
        assert_eq!(findings[1].message, "second");
    }
}
