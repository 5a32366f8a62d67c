//! The `check` use case: evaluate one page and produce a report.

use actguard_dom::{HtmlDocument, InlineStylesheets};
use actguard_domain::{Engine, PageBundle};
use actguard_settings::{ActguardConfigV1, Overrides, ResolvedConfig};
use actguard_types::{Outcome, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta};
use anyhow::Context;
use time::OffsetDateTime;
use tracing::info;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// HTML source of the page.
    pub html: &'a str,
    /// Extra stylesheets as `(origin, content)`, evaluated after the page's
    /// own `<style>` blocks.
    pub css: Vec<(String, String)>,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ReportEnvelope,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: resolve config, parse the page, run the engine, wrap the report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Empty config is allowed; defaults apply.
    let cfg = if input.config_text.trim().is_empty() {
        ActguardConfigV1::default()
    } else {
        actguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        actguard_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let engine = Engine::with_options(&resolved.options).context("configure engine")?;

    let doc = HtmlDocument::parse(input.html);
    let sheets = input
        .css
        .into_iter()
        .fold(InlineStylesheets::from_document(&doc), |sheets, (origin, content)| {
            sheets.with_css(origin, content)
        });
    let bundle = PageBundle::source(&doc).with_stylesheets(&sheets);

    let report = futures::executor::block_on(engine.run(&bundle)).context("evaluate page")?;
    let outcome = report.outcome();

    let finished_at = OffsetDateTime::now_utc();
    info!(
        profile = %resolved.profile,
        rules = report.rules.len(),
        %outcome,
        "check finished"
    );

    Ok(CheckOutput {
        report: ReportEnvelope {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "actguard".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            started_at,
            finished_at,
            outcome,
            report,
        },
        resolved_config: resolved,
    })
}

/// Map the page outcome to an exit code: 2 when any rule failed, else 0.
pub fn outcome_exit_code(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Failed => 2,
        Outcome::Warning | Outcome::Passed | Outcome::Inapplicable => 0,
    }
}
