//! ACT rule evaluation (no IO).
//!
//! Input: a page bundle whose documents are reached through collaborator
//! traits implemented elsewhere.
//! Output: a report with one rolled-up result per enabled rule.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod lang;
pub mod mapping;
pub mod model;
pub mod policy;
pub mod precondition;
pub mod report;
pub mod rule;
pub mod rules;

mod engine;

pub use catalog::RuleCatalog;
pub use engine::Engine;
pub use error::{EngineError, ProviderError, RuleError};
pub use model::PageBundle;
pub use policy::ConfigureOptions;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
