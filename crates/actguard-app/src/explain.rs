//! The `explain` and `rules` use cases: describe catalog entries.

use actguard_domain::Engine;
use actguard_domain::rule::Rule;
use actguard_types::{Level, Principle, SuccessCriterion};

/// Everything the catalog knows about one rule.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleExplanation {
    pub code: &'static str,
    pub external_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub url: String,
    pub principle: Principle,
    pub levels: Vec<Level>,
    pub success_criteria: Vec<SuccessCriterion>,
    pub target: &'static [&'static str],
    /// `pre/non-concurrent "html"`, or `unmapped`.
    pub placement: String,
}

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(RuleExplanation),
    /// Unknown identifier; includes every code with its ACT id.
    NotFound {
        identifier: String,
        available: Vec<(&'static str, &'static str)>,
    },
}

/// One line of `actguard rules`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSummary {
    pub code: &'static str,
    pub external_id: &'static str,
    pub principle: Principle,
    pub levels: Vec<Level>,
    pub name: &'static str,
}

/// Look up a rule by code or ACT id.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    let engine = Engine::new();
    match engine.catalog().resolve(identifier) {
        Some(rule) => ExplainOutput::Found(explain(&engine, rule)),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available: engine
                .catalog()
                .iter()
                .map(|rule| {
                    let d = rule.descriptor();
                    (d.code, d.external_id)
                })
                .collect(),
        },
    }
}

fn explain(engine: &Engine, rule: &dyn Rule) -> RuleExplanation {
    let d = rule.descriptor();
    let placement = match engine.selectors().placement_of(d.code) {
        Some(p) => format!("{}/{} \"{}\"", p.phase, p.class, p.selector),
        None => "unmapped".to_string(),
    };
    RuleExplanation {
        code: d.code,
        external_id: d.external_id,
        name: d.name,
        description: d.description,
        url: d.url(),
        principle: d.principle(),
        levels: d.levels(),
        success_criteria: d.success_criteria.iter().map(|c| c.to_dto()).collect(),
        target: d.target,
        placement,
    }
}

/// Every built-in rule in catalog order.
pub fn list_rules() -> Vec<RuleSummary> {
    let engine = Engine::new();
    engine
        .catalog()
        .iter()
        .map(|rule| {
            let d = rule.descriptor();
            RuleSummary {
                code: d.code,
                external_id: d.external_id,
                principle: d.principle(),
                levels: d.levels(),
                name: d.name,
            }
        })
        .collect()
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &RuleExplanation) -> String {
    let title = format!("{} ({}): {}", exp.code, exp.external_id, exp.name);
    let mut out = String::new();

    out.push_str(&title);
    out.push('\n');
    out.push_str(&"=".repeat(title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str(&format!("Principle: {}\n", exp.principle));
    out.push_str(&format!("Targets:   {}\n", exp.target.join(", ")));
    out.push_str(&format!("Dispatch:  {}\n", exp.placement));
    out.push_str(&format!("More:      {}\n\n", exp.url));
    out.push_str("Success criteria\n");
    out.push_str("----------------\n");
    for sc in &exp.success_criteria {
        out.push_str(&format!(
            "  - {} (level {}, {}) {}\n",
            sc.name, sc.level, sc.principle, sc.url
        ));
    }

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, available: &[(&str, &str)]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown rule code or ACT id: {}\n\n", identifier));
    out.push_str("Available rules:\n");
    for (code, external_id) in available {
        out.push_str(&format!("  - {} ({})\n", code, external_id));
    }

    out
}

/// One aligned line per rule.
pub fn format_rule_list(rules: &[RuleSummary]) -> String {
    let mut out = String::new();
    for rule in rules {
        let levels: Vec<&str> = rule.levels.iter().map(|l| l.as_str()).collect();
        out.push_str(&format!(
            "{:<11} {:<7} {:<15} {:<8} {}\n",
            rule.code,
            rule.external_id,
            rule.principle.as_str(),
            levels.join(","),
            rule.name
        ));
    }
    out
}
