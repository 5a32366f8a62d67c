//! Report serialization and the terminal summary.

use actguard_types::{Outcome, ReportEnvelope, SCHEMA_REPORT_V1};
use anyhow::Context;

pub fn serialize_report(report: &ReportEnvelope) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn parse_report_json(text: &str) -> anyhow::Result<ReportEnvelope> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;
    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }
    serde_json::from_value(value).context("parse actguard v1 report")
}

/// One line per rule that did not pass cleanly, then the totals.
pub fn render_summary(report: &ReportEnvelope) -> String {
    let mut out = String::new();
    for (code, result) in &report.report.rules {
        let outcome = result.outcome();
        if matches!(outcome, Outcome::Passed | Outcome::Inapplicable) {
            continue;
        }
        out.push_str(&format!("{:<8} {code}: {}\n", outcome.as_str(), result.name));
        for verdict in result.results.iter().filter(|v| v.outcome == outcome) {
            let at = verdict.pointer.as_deref().unwrap_or("page");
            out.push_str(&format!("  {} [{}] {}\n", at, verdict.result_code, verdict.description));
        }
    }

    let counts = &report.report.metadata;
    out.push_str(&format!(
        "actguard: {} ({} passed, {} warning, {} failed, {} inapplicable)\n",
        report.outcome, counts.passed, counts.warning, counts.failed, counts.inapplicable
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckInput, run_check};
    use actguard_settings::Overrides;

    fn sample() -> ReportEnvelope {
        run_check(CheckInput {
            html: r#"<html lang="en"><body><i id="d"></i><b id="d"></b></body></html>"#,
            css: Vec::new(),
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect("run_check")
        .report
    }

    #[test]
    fn serialized_report_parses_back() {
        let report = sample();
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.contains("\"schema\": \"actguard.report.v1\""));

        let parsed = parse_report_json(&text).expect("parse");
        assert_eq!(parsed.outcome, report.outcome);
        assert_eq!(parsed.report.rules.len(), report.report.rules.len());
    }

    #[test]
    fn foreign_schema_is_rejected() {
        let err = parse_report_json(r#"{"schema": "axe.report.v1"}"#).expect_err("schema");
        assert!(err.to_string().contains("unknown report schema"));
    }

    #[test]
    fn summary_lists_failures_with_locators() {
        let summary = render_summary(&sample());
        assert!(summary.contains("failed   QW-ACT-R18"));
        assert!(summary.contains("html > body:nth-child(2) > i:nth-child(1) [RC2]"));
        assert!(summary.lines().last().is_some_and(|l| l.starts_with("actguard: failed")));
        assert!(!summary.contains("QW-ACT-R2:"));
    }
}
