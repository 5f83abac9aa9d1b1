use crate::report::model::{Finding, LintOutcome};

/// Render the outcome in the classic one-line-per-finding form:
/// `Error: path:pointer: message`. Parse errors come first, findings in
/// their sorted order.
pub fn render_text(outcome: &LintOutcome) -> String {
    let mut out = String::new();
    for err in &outcome.parse_errors {
        out.push_str(&format!("ParseError: {err}\n"));
    }
    for finding in &outcome.findings {
        out.push_str(&render_finding(finding));
        out.push('\n');
    }
    out
}

fn render_finding(finding: &Finding) -> String {
    let location = &finding.location;
    let at = match (&location.line, &location.pointer) {
        (Some(line), _) => format!("{}:{line}", location.path.display()),
        (None, Some(pointer)) => format!("{}:{pointer}", location.path.display()),
        (None, None) => location.path.display().to_string(),
    };
    format!(
        "{}: {at}: {} [{}]",
        finding.severity, finding.message, finding.rule_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::parse::ParseError;
    use crate::report::model::{Finding, Location};

    #[test]
    fn renders_findings_with_pointer() {
        let outcome = LintOutcome {
            findings: vec![Finding::error(
                "runner-version",
                Location::with_pointer("ci.yml", "jobs.test.runs-on"),
                "ubuntu-latest is not recommended, use ubuntu-24.04",
            )],
            parse_errors: vec![],
            has_error: true,
        };

        let text = render_text(&outcome);
        assert_eq!(
            text,
            "Error: ci.yml:jobs.test.runs-on: ubuntu-latest is not recommended, \
             use ubuntu-24.04 [runner-version]\n"
        );
    }

    #[test]
    fn renders_parse_errors_first() {
        let outcome = LintOutcome {
            findings: vec![Finding::warning(
                "r",
                Location::file("composer.json"),
                "m",
            )],
            parse_errors: vec![ParseError {
                path: "broken.yml".into(),
                reason: "bad yaml".into(),
            }],
            has_error: false,
        };

        let text = render_text(&outcome);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("ParseError: broken.yml"));
        assert!(lines[1].starts_with("Warning: composer.json"));
    }

    #[test]
    fn empty_outcome_renders_empty() {
        let outcome = LintOutcome {
            findings: vec![],
            parse_errors: vec![],
            has_error: false,
        };
        assert!(render_text(&outcome).is_empty());
    }
}
