//! Rule enablement: configure options and the mask they narrow.

use crate::catalog::RuleCatalog;
use crate::error::EngineError;
use actguard_types::{Level, Principle};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Inclusion criteria accepted by `configure`.
///
/// Empty lists are treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigureOptions {
    pub principles: Vec<String>,
    pub levels: Vec<String>,
    /// Rule codes or external ids.
    pub rules: Vec<String>,
}

impl ConfigureOptions {
    pub fn is_empty(&self) -> bool {
        self.principles.is_empty() && self.levels.is_empty() && self.rules.is_empty()
    }
}

/// Options after normalization against a catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Normalized {
    principles: Option<Vec<Principle>>,
    levels: Option<Vec<Level>>,
    rules: BTreeSet<&'static str>,
}

/// Rule code to enabled flag. Every catalog code is present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnablementMask {
    enabled: BTreeMap<&'static str, bool>,
}

impl EnablementMask {
    /// All rules enabled.
    pub fn new(catalog: &RuleCatalog) -> Self {
        Self {
            enabled: catalog.codes().map(|code| (code, true)).collect(),
        }
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        self.enabled.get(code).copied().unwrap_or(false)
    }

    pub fn enabled_codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.enabled
            .iter()
            .filter(|(_, on)| **on)
            .map(|(code, _)| *code)
    }

    pub fn enable_all(&mut self) {
        self.enabled.values_mut().for_each(|on| *on = true);
    }

    /// Narrow the mask with `options`.
    ///
    /// 1. Principles and/or levels disable every rule with no success
    ///    criterion inside both sets (absent sets default to all values).
    /// 2. Rules alone act as an allow-list.
    /// 3. Rules given alongside principles/levels are re-enabled.
    ///
    /// Validation happens before any mutation, so an error leaves the mask
    /// unchanged.
    pub fn apply(
        &mut self,
        catalog: &RuleCatalog,
        options: &ConfigureOptions,
    ) -> Result<(), EngineError> {
        let normalized = normalize(catalog, options)?;
        let wcag_filter = normalized.principles.is_some() || normalized.levels.is_some();

        if wcag_filter {
            let principles = normalized
                .principles
                .unwrap_or_else(|| Principle::ALL.to_vec());
            let levels = normalized.levels.unwrap_or_else(|| Level::ALL.to_vec());
            for rule in catalog.iter() {
                let descriptor = rule.descriptor();
                if !descriptor.matches_wcag(&principles, &levels) {
                    self.set(descriptor.code, false);
                }
            }
        }

        if !normalized.rules.is_empty() {
            if wcag_filter {
                for code in &normalized.rules {
                    self.set(code, true);
                }
            } else {
                for (code, on) in self.enabled.iter_mut() {
                    if !normalized.rules.contains(code) {
                        *on = false;
                    }
                }
            }
        }

        Ok(())
    }

    fn set(&mut self, code: &str, on: bool) {
        if let Some(flag) = self.enabled.get_mut(code) {
            *flag = on;
        }
    }
}

fn normalize(catalog: &RuleCatalog, options: &ConfigureOptions) -> Result<Normalized, EngineError> {
    let principles = options
        .principles
        .iter()
        .map(|p| {
            Principle::parse(p)
                .ok_or_else(|| EngineError::Configuration(format!("unknown principle `{p}`")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let levels = options
        .levels
        .iter()
        .map(|l| {
            Level::parse(l).ok_or_else(|| EngineError::Configuration(format!("unknown level `{l}`")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rules = options
        .rules
        .iter()
        .map(|r| {
            catalog
                .resolve(r)
                .map(|rule| rule.descriptor().code)
                .ok_or_else(|| EngineError::Configuration(format!("unknown rule `{r}`")))
        })
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(Normalized {
        principles: (!principles.is_empty()).then_some(principles),
        levels: (!levels.is_empty()).then_some(levels),
        rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actguard_types::ids;

    fn options(principles: &[&str], levels: &[&str], rules: &[&str]) -> ConfigureOptions {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        ConfigureOptions {
            principles: owned(principles),
            levels: owned(levels),
            rules: owned(rules),
        }
    }

    fn enabled(mask: &EnablementMask) -> Vec<&'static str> {
        mask.enabled_codes().collect()
    }

    #[test]
    fn default_mask_enables_everything() {
        let catalog = RuleCatalog::builtin();
        let mask = EnablementMask::new(&catalog);
        assert_eq!(enabled(&mask).len(), catalog.len());
    }

    #[test]
    fn rules_alone_form_an_allow_list() {
        let catalog = RuleCatalog::builtin();
        let mut mask = EnablementMask::new(&catalog);
        mask.apply(&catalog, &options(&[], &[], &["qw-act-r18", "5b7ae0"]))
            .expect("apply");
        assert_eq!(
            enabled(&mask),
            vec![ids::RULE_ID_UNIQUE, ids::RULE_LANG_XML_LANG_MATCH]
        );
    }

    #[test]
    fn principle_filter_excludes_other_principles() {
        let catalog = RuleCatalog::builtin();
        let mut mask = EnablementMask::new(&catalog);
        mask.apply(&catalog, &options(&["operable"], &[], &[]))
            .expect("apply");
        for rule in catalog.iter() {
            let d = rule.descriptor();
            let operable = d
                .success_criteria
                .iter()
                .any(|c| c.principle == Principle::Operable);
            assert_eq!(mask.is_enabled(d.code), operable, "{}", d.code);
        }
        assert!(mask.is_enabled(ids::RULE_HTML_HAS_TITLE));
        assert!(!mask.is_enabled(ids::RULE_ID_UNIQUE));
    }

    #[test]
    fn named_rules_override_principle_exclusion() {
        let catalog = RuleCatalog::builtin();
        let mut mask = EnablementMask::new(&catalog);
        mask.apply(
            &catalog,
            &options(&["Operable"], &[], &[ids::RULE_ID_UNIQUE]),
        )
        .expect("apply");
        assert!(mask.is_enabled(ids::RULE_ID_UNIQUE));
        assert!(mask.is_enabled(ids::RULE_HTML_HAS_TITLE));
        assert!(!mask.is_enabled(ids::RULE_HTML_HAS_LANG));
    }

    #[test]
    fn level_filter_matches_per_criterion() {
        let catalog = RuleCatalog::builtin();
        let mut mask = EnablementMask::new(&catalog);
        mask.apply(&catalog, &options(&[], &["AA"], &[])).expect("apply");
        assert_eq!(
            enabled(&mask),
            vec![ids::RULE_META_VIEWPORT_ZOOM, ids::RULE_ORIENTATION_NOT_RESTRICTED]
        );
    }

    #[test]
    fn configure_is_cumulative() {
        let catalog = RuleCatalog::builtin();
        let mut mask = EnablementMask::new(&catalog);
        mask.apply(&catalog, &options(&["Understandable"], &[], &[]))
            .expect("first");
        mask.apply(&catalog, &options(&[], &[], &[ids::RULE_HTML_HAS_LANG, ids::RULE_ID_UNIQUE]))
            .expect("second");
        // R18 was disabled by the first call and an allow-list does not re-enable.
        assert_eq!(enabled(&mask), vec![ids::RULE_HTML_HAS_LANG]);
    }

    #[test]
    fn malformed_values_leave_mask_untouched() {
        let catalog = RuleCatalog::builtin();
        let mut mask = EnablementMask::new(&catalog);
        mask.apply(&catalog, &options(&["Robust"], &[], &[])).expect("apply");
        let before = mask.clone();

        for bad in [
            options(&["Visible"], &[], &[]),
            options(&[], &["AAAA"], &[]),
            options(&["Operable"], &[], &["QW-ACT-R404"]),
        ] {
            let err = mask.apply(&catalog, &bad).expect_err("invalid");
            assert!(matches!(err, EngineError::Configuration(_)));
            assert_eq!(mask, before);
        }
    }

    #[test]
    fn empty_options_change_nothing() {
        let catalog = RuleCatalog::builtin();
        let mut mask = EnablementMask::new(&catalog);
        mask.apply(&catalog, &ConfigureOptions::default()).expect("apply");
        assert_eq!(mask, EnablementMask::new(&catalog));

        mask.apply(&catalog, &options(&["Robust"], &[], &[])).expect("apply");
        mask.enable_all();
        assert_eq!(mask, EnablementMask::new(&catalog));
    }
}
