use crate::catalog::RuleCatalog;
use crate::error::{EngineError, RuleError};
use crate::mapping::{Phase, SchedulingClass, SelectorBinding, SelectorMap};
use crate::model::{DocumentProvider, PageBundle, RuleContext};
use crate::policy::{ConfigureOptions, EnablementMask};
use crate::report::ReportAggregator;
use crate::rule::{Rule, RuleRun, evaluate_candidate};
use actguard_types::{Report, RuleRunResult};
use futures::future::try_join_all;
use futures::stream::{FuturesUnordered, TryStreamExt};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Owns a rule catalog, its dispatch tables and the enablement mask.
///
/// Runs borrow the engine immutably and create fresh per-rule state, so one
/// engine serves any number of sequential runs.
#[derive(Debug)]
pub struct Engine {
    catalog: RuleCatalog,
    selectors: SelectorMap,
    mask: EnablementMask,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine over the built-in rules with every rule enabled.
    pub fn new() -> Self {
        Self::with_parts(RuleCatalog::builtin(), SelectorMap::builtin())
            .expect("built-in selector map must place every built-in rule exactly once")
    }

    /// Engine over a custom catalog. Every catalog rule must be placed in the
    /// selector map exactly once, and the map must name no other rule.
    pub fn with_parts(catalog: RuleCatalog, selectors: SelectorMap) -> Result<Self, EngineError> {
        let mut placed = BTreeSet::new();
        let mapped = selectors.placements().map(|(code, _)| code);
        for code in mapped.chain(selectors.unmapped.iter().map(String::as_str)) {
            let Some(rule) = catalog.get(code) else {
                return Err(EngineError::Catalog(format!(
                    "selector map names unknown rule `{code}`"
                )));
            };
            let code = rule.descriptor().code;
            if !placed.insert(code) {
                return Err(EngineError::Catalog(format!(
                    "rule `{code}` is placed more than once"
                )));
            }
        }
        if let Some(code) = catalog.codes().find(|code| !placed.contains(code)) {
            return Err(EngineError::Catalog(format!(
                "rule `{code}` has no selector binding"
            )));
        }

        let mask = EnablementMask::new(&catalog);
        Ok(Self {
            catalog,
            selectors,
            mask,
        })
    }

    /// Construct then configure.
    pub fn with_options(options: &ConfigureOptions) -> Result<Self, EngineError> {
        let mut engine = Self::new();
        engine.configure(options)?;
        Ok(engine)
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn selectors(&self) -> &SelectorMap {
        &self.selectors
    }

    /// Narrow the set of enabled rules. Cumulative across calls; an error
    /// leaves the current configuration untouched.
    pub fn configure(&mut self, options: &ConfigureOptions) -> Result<(), EngineError> {
        self.mask.apply(&self.catalog, options)?;
        debug!(
            enabled = self.mask.enabled_codes().count(),
            total = self.catalog.len(),
            "configuration applied"
        );
        Ok(())
    }

    /// Re-enable every rule.
    pub fn reset_configuration(&mut self) {
        self.mask.enable_all();
    }

    /// Whether the rule named by code or external id is enabled.
    pub fn is_enabled(&self, identifier: &str) -> bool {
        self.catalog
            .resolve(identifier)
            .is_some_and(|rule| self.mask.is_enabled(rule.descriptor().code))
    }

    pub fn enabled_codes(&self) -> Vec<&'static str> {
        self.mask.enabled_codes().collect()
    }

    /// Evaluate every enabled rule against `bundle`.
    ///
    /// The non-concurrent group, the concurrent group and the unmapped rules
    /// run concurrently; the first failure aborts the run.
    pub async fn run(&self, bundle: &PageBundle<'_>) -> Result<Report, EngineError> {
        let source = bundle
            .source
            .ok_or(EngineError::MissingInput("source document"))?;

        let rendered: &dyn DocumentProvider = match bundle.page {
            Some(page) => page,
            None => {
                warn!("no live page supplied; post-phase rules use the source document");
                source
            }
        };

        let pre = RuleContext {
            document: source,
            stylesheets: bundle.stylesheets,
            phase: Phase::Pre,
        };
        let post = RuleContext {
            document: rendered,
            stylesheets: bundle.stylesheets,
            phase: Phase::Post,
        };

        let (non_concurrent, concurrent, unmapped) = futures::try_join!(
            self.run_group(SchedulingClass::NonConcurrent, &pre, &post),
            self.run_group(SchedulingClass::Concurrent, &pre, &post),
            self.run_unmapped(&pre),
        )?;

        let mut aggregator = ReportAggregator::new();
        aggregator.extend(non_concurrent.into_iter().chain(concurrent).chain(unmapped));
        let report = aggregator.finish();

        info!(
            rules = report.rules.len(),
            passed = report.metadata.passed,
            warning = report.metadata.warning,
            failed = report.metadata.failed,
            inapplicable = report.metadata.inapplicable,
            "act rules run finished"
        );
        Ok(report)
    }

    /// Pre cell in declared order, then every post binding at once.
    async fn run_group(
        &self,
        class: SchedulingClass,
        pre: &RuleContext<'_>,
        post: &RuleContext<'_>,
    ) -> Result<Vec<RuleRunResult>, EngineError> {
        let mut results = Vec::new();
        for binding in self.selectors.cell(Phase::Pre, class) {
            results.extend(self.run_binding(binding, class, pre).await?);
        }

        let launched = self
            .selectors
            .cell(Phase::Post, class)
            .iter()
            .map(|binding| self.run_binding(binding, class, post));
        for batch in try_join_all(launched).await? {
            results.extend(batch);
        }
        Ok(results)
    }

    async fn run_binding(
        &self,
        binding: &SelectorBinding,
        class: SchedulingClass,
        ctx: &RuleContext<'_>,
    ) -> Result<Vec<RuleRunResult>, EngineError> {
        let rules: Vec<&dyn Rule> = binding
            .rules
            .iter()
            .filter_map(|code| self.catalog.get(code))
            .filter(|rule| self.mask.is_enabled(rule.descriptor().code))
            .collect();
        if rules.is_empty() {
            return Ok(Vec::new());
        }

        let elements = ctx
            .document
            .select(&binding.selector)
            .await
            .map_err(|source| EngineError::Collaborator {
                context: format!("resolving `{}` ({} phase)", binding.selector, ctx.phase),
                source,
            })?;

        let mut results = Vec::with_capacity(rules.len());
        for rule in rules {
            let code = rule.descriptor().code;
            let fail = |err: RuleError| EngineError::from_rule(code, err);
            debug!(
                rule = code,
                selector = %binding.selector,
                phase = %ctx.phase,
                class = %class,
                nodes = elements.len(),
                "dispatching rule"
            );

            let mut run = RuleRun::new(rule);
            if elements.is_empty() {
                run.execute(None, ctx).await.map_err(fail)?;
            } else {
                match class {
                    SchedulingClass::NonConcurrent => {
                        for element in &elements {
                            run.execute(Some(element.as_ref()), ctx)
                                .await
                                .map_err(fail)?;
                        }
                    }
                    SchedulingClass::Concurrent => {
                        let mut pending: FuturesUnordered<_> = elements
                            .iter()
                            .map(|element| evaluate_candidate(rule, Some(element.as_ref()), ctx))
                            .collect();
                        while let Some(verdict) = pending.try_next().await.map_err(fail)? {
                            run.record(verdict).map_err(fail)?;
                        }
                    }
                }
            }
            results.push(run.finish());
        }
        Ok(results)
    }

    async fn run_unmapped(&self, ctx: &RuleContext<'_>) -> Result<Vec<RuleRunResult>, EngineError> {
        let mut results = Vec::new();
        for code in &self.selectors.unmapped {
            let Some(rule) = self.catalog.get(code) else {
                continue;
            };
            let code = rule.descriptor().code;
            if !self.mask.is_enabled(code) {
                continue;
            }
            debug!(rule = code, "dispatching unmapped rule");

            let mut run = RuleRun::new(rule);
            run.execute(None, ctx)
                .await
                .map_err(|err| EngineError::from_rule(code, err))?;
            results.push(run.finish());
        }
        Ok(results)
    }
}
