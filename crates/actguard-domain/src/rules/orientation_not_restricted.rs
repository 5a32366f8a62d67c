//! Orientation lock detection over raw stylesheet text.
//!
//! Looks for `@media` blocks conditioned on `orientation` whose declarations
//! rotate content by a quarter turn, the usual way pages force one
//! orientation.

use crate::error::RuleError;
use crate::model::{Element, RuleContext};
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_ORIENTATION_NOT_RESTRICTED,
    external_id: ids::ACT_ORIENTATION_NOT_RESTRICTED,
    name: "Orientation of the page is not restricted using CSS transform property",
    description: "This rule checks that page content is not restricted to either landscape or portrait orientation using CSS transform property.",
    target: &[],
    success_criteria: &[Criterion::new(
        "1.3.4",
        Level::AA,
        Principle::Perceivable,
        "https://www.w3.org/WAI/WCAG21/Understanding/orientation",
    )],
};

#[derive(Debug, Default)]
pub struct OrientationNotRestricted;

#[async_trait(?Send)]
impl Rule for OrientationNotRestricted {
    fn descriptor(&self) -> &RuleDescriptor {
        &DESCRIPTOR
    }

    async fn evaluate(
        &self,
        _element: &dyn Element,
        ctx: &RuleContext<'_>,
    ) -> Result<Verdict, RuleError> {
        self.evaluate_without_element(ctx).await
    }

    async fn evaluate_without_element(&self, ctx: &RuleContext<'_>) -> Result<Verdict, RuleError> {
        let Some(provider) = ctx.stylesheets else {
            return Ok(Verdict::inapplicable("No stylesheets were supplied.", "RC1"));
        };

        let mut orientation_blocks = 0usize;
        let mut locked = Vec::new();
        for sheet in provider.stylesheets().await? {
            let css = strip_comments(&sheet.content);
            for block in orientation_media_blocks(&css) {
                orientation_blocks += 1;
                if rotates_quarter_turn(block) {
                    locked.push(sheet.origin.clone().unwrap_or_else(|| "inline".to_string()));
                }
            }
        }

        if orientation_blocks == 0 {
            return Ok(Verdict::inapplicable(
                "No `orientation` media queries were found.",
                "RC2",
            ));
        }
        if locked.is_empty() {
            return Ok(Verdict::passed(
                "Orientation media queries don't rotate the page content.",
                "RC3",
            ));
        }
        Ok(Verdict::failed(
            format!(
                "{} orientation media {} rotate the page content by a quarter turn ({}).",
                locked.len(),
                if locked.len() == 1 { "query" } else { "queries" },
                locked.join(", ")
            ),
            "RC4",
        ))
    }
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Bodies of `@media` blocks whose prelude mentions `orientation`.
fn orientation_media_blocks(css: &str) -> Vec<&str> {
    let lower = css.to_ascii_lowercase();
    let mut blocks = Vec::new();
    let mut cursor = 0;
    while let Some(found) = lower[cursor..].find("@media") {
        let start = cursor + found;
        let Some(open) = lower[start..].find('{').map(|i| start + i) else {
            break;
        };
        let close = matching_brace(css, open).unwrap_or(css.len());
        if lower[start..open].contains("orientation") {
            blocks.push(&css[open + 1..close]);
        }
        cursor = open + 1;
    }
    blocks
}

fn matching_brace(css: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in css[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn rotates_quarter_turn(block: &str) -> bool {
    block
        .split(['{', '}', ';'])
        .filter_map(|decl| decl.split_once(':'))
        .any(|(property, value)| {
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim().to_ascii_lowercase();
            match property.as_str() {
                "transform" => rotate_arguments(&value).any(is_quarter_turn),
                "rotate" => value
                    .split_whitespace()
                    .last()
                    .is_some_and(is_quarter_turn),
                _ => false,
            }
        })
}

/// Arguments of every `rotate(...)`/`rotatez(...)` call in a transform list.
fn rotate_arguments(value: &str) -> impl Iterator<Item = &str> {
    value.match_indices("rotate").filter_map(move |(at, _)| {
        let rest = &value[at + "rotate".len()..];
        let rest = rest.strip_prefix('z').unwrap_or(rest);
        let inner = rest.strip_prefix('(')?;
        inner.find(')').map(|end| inner[..end].trim())
    })
}

fn is_quarter_turn(angle: &str) -> bool {
    parse_angle_degrees(angle).is_some_and(|deg| {
        let normalized = deg.rem_euclid(180.0);
        (normalized - 90.0).abs() < 0.5
    })
}

fn parse_angle_degrees(angle: &str) -> Option<f64> {
    let angle = angle.trim();
    let units = [
        ("deg", 1.0),
        ("grad", 0.9),
        ("rad", 180.0 / std::f64::consts::PI),
        ("turn", 360.0),
    ];
    units.iter().find_map(|(unit, factor)| {
        angle
            .strip_suffix(unit)
            .and_then(|number| number.trim().parse::<f64>().ok())
            .map(|n| n * factor)
    })
}
