//! The rule contract and the per-run verdict lifecycle.
//!
//! A [`Rule`] is immutable: it describes itself and judges one candidate at a
//! time. Accumulated verdicts live in a [`RuleRun`], which the dispatcher
//! creates fresh for every run:
//!
//! ```text
//! Idle --execute--> Running --final_results--> Finalized --reset--> Idle
//! ```

use crate::error::RuleError;
use crate::model::{Element, RuleContext};
use crate::precondition::{Precondition, check_chain};
use actguard_types::{
    Level, Outcome, OutcomeCounts, Principle, RuleRunMetadata, RuleRunResult, SuccessCriterion,
    Verdict, ids,
};
use async_trait::async_trait;
use std::fmt;

/// One WCAG success criterion a rule maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Criterion {
    /// Criterion number, e.g. `"2.4.2"`.
    pub name: &'static str,
    pub level: Level,
    pub principle: Principle,
    pub url: &'static str,
}

impl Criterion {
    pub const fn new(
        name: &'static str,
        level: Level,
        principle: Principle,
        url: &'static str,
    ) -> Self {
        Self {
            name,
            level,
            principle,
            url,
        }
    }

    pub fn to_dto(self) -> SuccessCriterion {
        SuccessCriterion {
            name: self.name.to_string(),
            level: self.level,
            principle: self.principle,
            url: self.url.to_string(),
        }
    }
}

/// Static metadata of a rule. Immutable once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Stable internal code, `QW-ACT-R<n>`.
    pub code: &'static str,
    /// Canonical ACT rules id.
    pub external_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Selectors naming the rule's candidate nodes.
    pub target: &'static [&'static str],
    /// Never empty; the first entry carries the rule's primary principle.
    pub success_criteria: &'static [Criterion],
}

impl RuleDescriptor {
    pub fn url(&self) -> String {
        format!("https://act-rules.github.io/rules/{}", self.external_id)
    }

    pub fn principle(&self) -> Principle {
        self.success_criteria
            .first()
            .map(|c| c.principle)
            .unwrap_or(Principle::Perceivable)
    }

    /// Distinct levels across the success criteria, in ascending order.
    pub fn levels(&self) -> Vec<Level> {
        let mut levels: Vec<Level> = self.success_criteria.iter().map(|c| c.level).collect();
        levels.sort_unstable();
        levels.dedup();
        levels
    }

    /// True when one success criterion has a principle in `principles` and a
    /// level in `levels`.
    pub fn matches_wcag(&self, principles: &[Principle], levels: &[Level]) -> bool {
        self.success_criteria
            .iter()
            .any(|c| principles.contains(&c.principle) && levels.contains(&c.level))
    }
}

#[async_trait(?Send)]
pub trait Rule: fmt::Debug {
    fn descriptor(&self) -> &RuleDescriptor;

    /// Ordered applicability gates checked before [`Rule::evaluate`].
    fn preconditions(&self) -> &[Precondition] {
        &[]
    }

    /// Judge one candidate that passed every gate.
    async fn evaluate(
        &self,
        element: &dyn Element,
        ctx: &RuleContext<'_>,
    ) -> Result<Verdict, RuleError>;

    /// Judge the "no candidate" sentinel when no gate rejected it.
    async fn evaluate_without_element(&self, _ctx: &RuleContext<'_>) -> Result<Verdict, RuleError> {
        Ok(Verdict::inapplicable(
            "No candidate element exists in the document.",
            ids::GATE_ELEMENT_EXISTS,
        ))
    }
}

/// Gate then evaluate one candidate, attaching its snapshot and locator.
pub async fn evaluate_candidate(
    rule: &dyn Rule,
    element: Option<&dyn Element>,
    ctx: &RuleContext<'_>,
) -> Result<Verdict, RuleError> {
    let mut verdict = match check_chain(rule.preconditions(), element, ctx).await? {
        Some(rejection) => rejection,
        None => match element {
            Some(element) => rule.evaluate(element, ctx).await?,
            None => rule.evaluate_without_element(ctx).await?,
        },
    };

    if let Some(element) = element {
        if verdict.html_code.is_none() {
            verdict.html_code = Some(element.outer_html().await?);
        }
        if verdict.pointer.is_none() {
            verdict.pointer = Some(element.locator().await?);
        }
    }
    Ok(verdict)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Finalized,
}

/// Verdicts accumulated for one rule during one run.
#[derive(Debug)]
pub struct RuleRun<'r> {
    rule: &'r dyn Rule,
    state: RunState,
    verdicts: Vec<Verdict>,
}

impl<'r> RuleRun<'r> {
    pub fn new(rule: &'r dyn Rule) -> Self {
        Self {
            rule,
            state: RunState::Idle,
            verdicts: Vec::new(),
        }
    }

    pub fn rule(&self) -> &'r dyn Rule {
        self.rule
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    /// Evaluate one candidate (`None` for the no-match sentinel) and append
    /// its verdict.
    pub async fn execute(
        &mut self,
        element: Option<&dyn Element>,
        ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        self.ensure_open()?;
        let verdict = evaluate_candidate(self.rule, element, ctx).await?;
        self.record(verdict)
    }

    /// Append a verdict produced outside [`RuleRun::execute`], e.g. by a
    /// concurrent fan-out.
    pub fn record(&mut self, verdict: Verdict) -> Result<(), RuleError> {
        self.ensure_open()?;
        self.verdicts.push(verdict);
        self.state = RunState::Running;
        Ok(())
    }

    /// Roll up the accumulated verdicts and mark the run finalized.
    pub fn final_results(&mut self) -> RuleRunResult {
        self.state = RunState::Finalized;

        let descriptor = self.rule.descriptor();
        let outcome = Outcome::rollup(self.verdicts.iter().map(|v| v.outcome));
        let description = self
            .verdicts
            .iter()
            .find(|v| v.outcome == outcome)
            .map(|v| v.description.clone())
            .unwrap_or_default();

        RuleRunResult {
            code: descriptor.code.to_string(),
            mapping: descriptor.external_id.to_string(),
            name: descriptor.name.to_string(),
            description: descriptor.description.to_string(),
            metadata: RuleRunMetadata {
                outcome,
                description,
                counts: OutcomeCounts::from_verdicts(&self.verdicts),
                target: descriptor.target.iter().map(|s| s.to_string()).collect(),
                success_criteria: descriptor
                    .success_criteria
                    .iter()
                    .map(|c| c.to_dto())
                    .collect(),
                url: descriptor.url(),
            },
            results: self.verdicts.clone(),
        }
    }

    /// Discard accumulated state and return to idle.
    pub fn reset(&mut self) {
        self.verdicts.clear();
        self.state = RunState::Idle;
    }

    /// Pull the finalized result and reset in one step.
    pub fn finish(&mut self) -> RuleRunResult {
        let result = self.final_results();
        self.reset();
        result
    }

    fn ensure_open(&self) -> Result<(), RuleError> {
        match self.state {
            RunState::Finalized => Err(RuleError::AlreadyFinalized),
            RunState::Idle | RunState::Running => Ok(()),
        }
    }
}
