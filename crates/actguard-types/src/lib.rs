//! Stable DTOs and IDs used across the actguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report and its envelope
//! - WCAG classification enums (principles, conformance levels)
//! - stable string IDs for rules and gate result codes

#![forbid(unsafe_code)]

pub mod ids;
pub mod receipt;
pub mod wcag;

pub use receipt::{
    Outcome, OutcomeCounts, Report, ReportEnvelope, RuleRunMetadata, RuleRunResult,
    SuccessCriterion, ToolMeta, Verdict, REPORT_TYPE, SCHEMA_REPORT_V1,
};
pub use wcag::{Level, Principle};
