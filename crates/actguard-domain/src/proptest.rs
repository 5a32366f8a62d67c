//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Outcome rollup independence from verdict order
//! - Concurrent dispatch producing stable rollups and tallies
//! - Configuration precedence, idempotence and reset

use crate::catalog::RuleCatalog;
use crate::engine::Engine;
use crate::mapping::{Phase, SchedulingClass, SelectorMap};
use crate::model::PageBundle;
use crate::policy::ConfigureOptions;
use crate::test_support::{FakeDocument, FakeElement, ScriptedRule, block_on};
use actguard_types::{Level, Outcome, OutcomeCounts, Principle, Verdict};
use proptest::prelude::*;
use proptest::sample::subsequence;

// ============================================================================
// Strategies
// ============================================================================

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Inapplicable),
        Just(Outcome::Passed),
        Just(Outcome::Warning),
        Just(Outcome::Failed),
    ]
}

/// Outcome plus how many times the candidate suspends before answering.
fn arb_candidates() -> impl Strategy<Value = Vec<(Outcome, usize)>> {
    prop::collection::vec((arb_outcome(), 0usize..6), 1..12)
}

fn arb_principles() -> impl Strategy<Value = Vec<String>> {
    subsequence(Principle::ALL.to_vec(), 0..=4)
        .prop_map(|ps| ps.into_iter().map(|p| p.as_str().to_lowercase()).collect())
}

fn arb_levels() -> impl Strategy<Value = Vec<String>> {
    subsequence(Level::ALL.to_vec(), 0..=3)
        .prop_map(|ls| ls.into_iter().map(|l| l.as_str().to_string()).collect())
}

fn arb_rules() -> impl Strategy<Value = Vec<String>> {
    let codes: Vec<&'static str> = RuleCatalog::builtin().codes().collect();
    subsequence(codes, 0..=4).prop_map(|cs| cs.into_iter().map(str::to_string).collect())
}

fn arb_options() -> impl Strategy<Value = ConfigureOptions> {
    (arb_principles(), arb_levels(), arb_rules()).prop_map(|(principles, levels, rules)| {
        ConfigureOptions {
            principles,
            levels,
            rules,
        }
    })
}

fn concurrent_engine() -> Engine {
    let catalog =
        RuleCatalog::new(vec![Box::new(ScriptedRule::new("QW-ACT-R90"))]).expect("catalog");
    let mut selectors = SelectorMap::default();
    selectors.bind(
        Phase::Post,
        SchedulingClass::Concurrent,
        "[data-outcome]",
        ["QW-ACT-R90"],
    );
    Engine::with_parts(catalog, selectors).expect("engine")
}

// ============================================================================
// Property tests: rollup and dispatch
// ============================================================================

proptest! {
    /// Rollup depends only on the multiset of outcomes.
    #[test]
    fn rollup_ignores_order(
        (original, shuffled) in prop::collection::vec(arb_outcome(), 0..16)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        prop_assert_eq!(Outcome::rollup(original.clone()), Outcome::rollup(shuffled.clone()));

        let verdicts = |outcomes: &[Outcome]| -> Vec<Verdict> {
            outcomes.iter().map(|o| Verdict::new(*o, "", "RC")).collect()
        };
        prop_assert_eq!(
            OutcomeCounts::from_verdicts(&verdicts(&original)),
            OutcomeCounts::from_verdicts(&verdicts(&shuffled))
        );
    }

    /// Concurrent fan-out completes in arbitrary order but the rollup and
    /// tallies match the candidates.
    #[test]
    fn concurrent_dispatch_is_order_independent(candidates in arb_candidates()) {
        let elements = candidates
            .iter()
            .enumerate()
            .map(|(i, (outcome, yields))| {
                FakeElement::new("div")
                    .attr("data-outcome", outcome.as_str())
                    .locator(&format!("div:nth-of-type({})", i + 1))
                    .yields(*yields)
                    .build()
            })
            .collect();
        let doc = FakeDocument::new().with("[data-outcome]", elements);
        let engine = concurrent_engine();

        let report = block_on(engine.run(&PageBundle::source(&doc))).expect("run");
        let result = &report.rules["QW-ACT-R90"];

        let outcomes: Vec<Outcome> = candidates.iter().map(|(o, _)| *o).collect();
        prop_assert_eq!(result.outcome(), Outcome::rollup(outcomes.iter().copied()));
        prop_assert_eq!(result.results.len(), candidates.len());

        let mut expected = OutcomeCounts::default();
        outcomes.iter().for_each(|o| expected.record(*o));
        prop_assert_eq!(&result.metadata.counts, &expected);

        let mut pointers: Vec<_> = result.results.iter().filter_map(|v| v.pointer.clone()).collect();
        pointers.sort();
        pointers.dedup();
        prop_assert_eq!(pointers.len(), candidates.len());
    }
}

// ============================================================================
// Property tests: configuration
// ============================================================================

proptest! {
    /// Rules named next to a principle/level filter always end up enabled.
    #[test]
    fn named_rules_survive_wcag_filters(options in arb_options()) {
        let mut engine = Engine::new();
        engine.configure(&options).expect("valid options");

        let filtered = !options.principles.is_empty() || !options.levels.is_empty();
        for code in &options.rules {
            prop_assert!(engine.is_enabled(code), "{} should be enabled", code);
        }
        if !filtered && !options.rules.is_empty() {
            prop_assert_eq!(engine.enabled_codes().len(), options.rules.len());
        }
    }

    /// Applying the same options twice equals applying them once.
    #[test]
    fn configure_is_idempotent(options in arb_options()) {
        let mut once = Engine::new();
        once.configure(&options).expect("valid options");
        let mut twice = Engine::new();
        twice.configure(&options).expect("valid options");
        twice.configure(&options).expect("valid options");
        prop_assert_eq!(once.enabled_codes(), twice.enabled_codes());
    }

    /// Reset restores the full catalog whatever came before.
    #[test]
    fn reset_restores_everything(first in arb_options(), second in arb_options()) {
        let mut engine = Engine::new();
        engine.configure(&first).expect("valid options");
        engine.configure(&second).expect("valid options");
        engine.reset_configuration();
        prop_assert_eq!(engine.enabled_codes().len(), engine.catalog().len());
    }
}
