//! # dstok-report
//!
//! **Tier 3 (Report Aggregation)**
//!
//! Merges checker findings into one pass/fail report and maps it to exit-code
//! semantics. This crate is the sole join point between the checkers and an
//! external CLI driver; it knows nothing about processes itself.

use dstok_types::{CollisionFinding, CollisionReport, Severity};

/// Concatenate checker results into one report. Input order is preserved:
/// callers pass checker results in a fixed order, and each checker's output
/// is already deterministic.
pub fn aggregate<I>(checker_results: I) -> CollisionReport
where
    I: IntoIterator<Item = Vec<CollisionFinding>>,
{
    let findings: Vec<CollisionFinding> = checker_results.into_iter().flatten().collect();
    CollisionReport::from_findings(findings)
}

/// The exit code a CLI driver should use: `0` iff the report is valid.
pub fn exit_code(report: &CollisionReport) -> i32 {
    if report.is_valid { 0 } else { 1 }
}

/// Render the human-readable report.
pub fn render_text(report: &CollisionReport) -> String {
    let mut out = String::new();

    if report.is_valid {
        out.push_str(&format!(
            "Collision check PASSED ({} finding(s), {} warning(s))\n",
            report.findings.len(),
            report.warnings()
        ));
    } else {
        out.push_str(&format!(
            "Collision check FAILED: {} error(s), {} warning(s)\n",
            report.errors(),
            report.warnings()
        ));
    }

    for finding in &report.findings {
        out.push('\n');
        out.push_str(&format!(
            "[{}] {}: {}\n",
            severity_tag(finding.severity),
            finding.category,
            finding.message
        ));
        for line in &finding.evidence {
            out.push_str(&format!("        evidence: {line}\n"));
        }
        for line in &finding.remediation {
            out.push_str(&format!("        fix: {line}\n"));
        }
    }

    out
}

/// Render the report as pretty JSON.
pub fn render_json(report: &CollisionReport) -> String {
    serde_json::to_string_pretty(report).expect("report serialization cannot fail")
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "ERROR",
        Severity::Warning => "WARN ",
        Severity::Info => "INFO ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dstok_types::{Category, CollisionFinding};

    fn finding(severity: Severity, message: &str) -> CollisionFinding {
        CollisionFinding::new(Category::NameClash, severity, message)
    }

    #[test]
    fn aggregate_concatenates_in_order() {
        let report = aggregate([
            vec![finding(Severity::Warning, "first")],
            vec![],
            vec![finding(Severity::Error, "second")],
        ]);
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.findings[0].message, "first");
        assert_eq!(report.findings[1].message, "second");
        assert!(!report.is_valid);
    }

    #[test]
    fn exit_code_is_zero_iff_valid() {
        let passing = aggregate([vec![finding(Severity::Warning, "w")]]);
        assert_eq!(exit_code(&passing), 0);

        let failing = aggregate([vec![finding(Severity::Error, "e")]]);
        assert_eq!(exit_code(&failing), 1);
    }

    #[test]
    fn warnings_and_info_never_fail_the_report() {
        let report = aggregate([vec![
            finding(Severity::Warning, "w"),
            finding(Severity::Info, "i"),
        ]]);
        assert!(report.is_valid);
        assert_eq!(exit_code(&report), 0);
    }

    #[test]
    fn empty_aggregate_passes() {
        let report = aggregate(Vec::<Vec<CollisionFinding>>::new());
        assert!(report.is_valid);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn text_rendering_snapshot() {
        let report = aggregate([vec![
            CollisionFinding::new(
                Category::PortConflict,
                Severity::Error,
                "port 6006 is claimed by two documentation servers",
            )
            .with_evidence(vec![
                "docs/a.toml: owns port 6006 (first in path order)".to_string(),
                "docs/b.toml: also declares port 6006".to_string(),
            ])
            .with_remediation(vec!["move `docs/b.toml` to its required port 7007".to_string()]),
            CollisionFinding::new(
                Category::NamespaceViolation,
                Severity::Warning,
                "package `widgets` is missing the `@ds/` scope",
            ),
        ]]);

        insta::assert_snapshot!(render_text(&report));
    }

    #[test]
    fn json_rendering_is_stable() {
        let report = aggregate([vec![finding(Severity::Error, "e")]]);
        let first = render_json(&report);
        let second = render_json(&report);
        assert_eq!(first, second);
        assert!(first.contains("\"is_valid\": false"));
    }
}
