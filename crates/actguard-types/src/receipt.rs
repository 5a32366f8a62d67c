use crate::{Level, Principle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifier for the report envelope.
pub const SCHEMA_REPORT_V1: &str = "actguard.report.v1";

/// Type tag carried by every [`Report`].
pub const REPORT_TYPE: &str = "act-rules";

/// Outcome of evaluating one rule against one candidate, or the rollup of a
/// whole rule run.
///
/// Variants are declared from best to worst so that `Ord` is the rollup
/// precedence: the maximum of a set of outcomes is its worst case.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Inapplicable,
    Passed,
    Warning,
    Failed,
}

impl Outcome {
    /// Worst-case outcome of a set; `Inapplicable` when the set is empty.
    pub fn rollup<I>(outcomes: I) -> Outcome
    where
        I: IntoIterator<Item = Outcome>,
    {
        outcomes
            .into_iter()
            .max()
            .unwrap_or(Outcome::Inapplicable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Inapplicable => "inapplicable",
            Outcome::Passed => "passed",
            Outcome::Warning => "warning",
            Outcome::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OutcomeCounts {
    pub passed: u32,
    pub warning: u32,
    pub failed: u32,
    pub inapplicable: u32,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Warning => self.warning += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Inapplicable => self.inapplicable += 1,
        }
    }

    pub fn from_verdicts(verdicts: &[Verdict]) -> Self {
        let mut counts = OutcomeCounts::default();
        for v in verdicts {
            counts.record(v.outcome);
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.passed + self.warning + self.failed + self.inapplicable
    }
}

/// Result of evaluating one rule against one candidate node (or its absence).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub outcome: Outcome,
    pub description: String,
    pub result_code: String,

    /// Outer markup of the evaluated node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_code: Option<String>,

    /// CSS path locating the evaluated node in its document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
}

impl Verdict {
    pub fn new(outcome: Outcome, description: impl Into<String>, result_code: &str) -> Self {
        Self {
            outcome,
            description: description.into(),
            result_code: result_code.to_string(),
            html_code: None,
            pointer: None,
        }
    }

    pub fn passed(description: impl Into<String>, result_code: &str) -> Self {
        Self::new(Outcome::Passed, description, result_code)
    }

    pub fn failed(description: impl Into<String>, result_code: &str) -> Self {
        Self::new(Outcome::Failed, description, result_code)
    }

    pub fn warning(description: impl Into<String>, result_code: &str) -> Self {
        Self::new(Outcome::Warning, description, result_code)
    }

    pub fn inapplicable(description: impl Into<String>, result_code: &str) -> Self {
        Self::new(Outcome::Inapplicable, description, result_code)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuccessCriterion {
    pub name: String,
    pub level: Level,
    pub principle: Principle,
    pub url: String,
}

/// Rule-level summary of one run: rollup outcome plus per-outcome tallies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleRunMetadata {
    pub outcome: Outcome,
    pub description: String,
    #[serde(flatten)]
    pub counts: OutcomeCounts,
    pub target: Vec<String>,
    pub success_criteria: Vec<SuccessCriterion>,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleRunResult {
    pub code: String,
    /// Canonical ACT rule id this code maps to.
    pub mapping: String,
    pub name: String,
    pub description: String,
    pub metadata: RuleRunMetadata,
    pub results: Vec<Verdict>,
}

impl RuleRunResult {
    pub fn outcome(&self) -> Outcome {
        self.metadata.outcome
    }
}

/// The structured report of one engine invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    #[serde(rename = "type")]
    pub report_type: String,
    pub metadata: OutcomeCounts,
    pub rules: BTreeMap<String, RuleRunResult>,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            report_type: REPORT_TYPE.to_string(),
            metadata: OutcomeCounts::default(),
            rules: BTreeMap::new(),
        }
    }
}

impl Report {
    /// Worst rollup across all rules in the report.
    pub fn outcome(&self) -> Outcome {
        Outcome::rollup(self.rules.values().map(RuleRunResult::outcome))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Versioned wrapper the application layer writes to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub outcome: Outcome,
    pub report: Report,
}
