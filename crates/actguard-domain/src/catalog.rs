use crate::error::EngineError;
use crate::rule::Rule;
use crate::rules;
use std::collections::BTreeMap;

/// Registry of rule instances keyed by code, with a bijective code to
/// external-id table. Lookups are case-insensitive.
#[derive(Debug)]
pub struct RuleCatalog {
    rules: Vec<Box<dyn Rule>>,
    by_code: BTreeMap<String, usize>,
    by_external_id: BTreeMap<String, usize>,
}

impl RuleCatalog {
    /// Build a catalog, rejecting duplicate codes or external ids and any
    /// identifier that names two different rules.
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Result<Self, EngineError> {
        let mut by_code = BTreeMap::new();
        let mut by_external_id = BTreeMap::new();

        for (index, rule) in rules.iter().enumerate() {
            let descriptor = rule.descriptor();
            let code = descriptor.code.to_ascii_lowercase();
            let external_id = descriptor.external_id.to_ascii_lowercase();

            if by_code.insert(code.clone(), index).is_some() {
                return Err(EngineError::Catalog(format!(
                    "duplicate rule code `{}`",
                    descriptor.code
                )));
            }
            if by_external_id.insert(external_id.clone(), index).is_some() {
                return Err(EngineError::Catalog(format!(
                    "duplicate external id `{}`",
                    descriptor.external_id
                )));
            }
        }

        // A code must not double as another rule's external id.
        for (code, index) in &by_code {
            if let Some(other) = by_external_id.get(code)
                && other != index
            {
                return Err(EngineError::Catalog(format!(
                    "identifier `{code}` names two rules"
                )));
            }
        }

        Ok(Self {
            rules,
            by_code,
            by_external_id,
        })
    }

    /// The built-in rule set.
    pub fn builtin() -> Self {
        Self::new(rules::builtin()).expect("built-in rule codes and ids must be unique")
    }

    /// Look up a rule by its code.
    pub fn get(&self, code: &str) -> Option<&dyn Rule> {
        let index = *self.by_code.get(&code.trim().to_ascii_lowercase())?;
        Some(self.rules[index].as_ref())
    }

    /// Look up a rule by code or external id.
    pub fn resolve(&self, identifier: &str) -> Option<&dyn Rule> {
        let key = identifier.trim().to_ascii_lowercase();
        let index = self
            .by_code
            .get(&key)
            .or_else(|| self.by_external_id.get(&key))?;
        Some(self.rules[*index].as_ref())
    }

    /// Rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.descriptor().code)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
