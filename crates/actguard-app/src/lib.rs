//! Use case orchestration for actguard.
//!
//! This crate provides the application layer: use cases that coordinate settings, the DOM
//! adapter, and the engine. It stays thin and delegates the heavy lifting to those layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;

pub use check::{CheckInput, CheckOutput, outcome_exit_code, run_check};
pub use explain::{
    ExplainOutput, RuleExplanation, RuleSummary, format_explanation, format_not_found,
    format_rule_list, list_rules, run_explain,
};
pub use render::{parse_report_json, render_summary, serialize_report};
