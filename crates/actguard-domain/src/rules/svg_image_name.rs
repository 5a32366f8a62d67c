use crate::error::RuleError;
use crate::model::{Element, RuleContext};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

const IMAGE_ROLES: &[&str] = &["img", "graphics-document", "graphics-symbol"];

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_SVG_IMAGE_NAME,
    external_id: ids::ACT_SVG_IMAGE_NAME,
    name: "svg element with explicit role has non-empty accessible name",
    description: "This rule checks that each SVG image element that is explicitly included in the accessibility tree has an accessible name.",
    target: &["svg", "svg *"],
    success_criteria: &[Criterion::new(
        "1.1.1",
        Level::A,
        Principle::Perceivable,
        "https://www.w3.org/WAI/WCAG21/Understanding/non-text-content",
    )],
};

const GATES: &[Precondition] = &[Precondition::ElementExists];

#[derive(Debug, Default)]
pub struct SvgImageName;

#[async_trait(?Send)]
impl Rule for SvgImageName {
    fn descriptor(&self) -> &RuleDescriptor {
        &DESCRIPTOR
    }

    fn preconditions(&self) -> &[Precondition] {
        GATES
    }

    async fn evaluate(
        &self,
        element: &dyn Element,
        _ctx: &RuleContext<'_>,
    ) -> Result<Verdict, RuleError> {
        let role = element.attribute("role").await?.unwrap_or_default();
        let explicit_image = role
            .split_ascii_whitespace()
            .next()
            .is_some_and(|r| IMAGE_ROLES.iter().any(|known| known.eq_ignore_ascii_case(r)));
        if !explicit_image || element.is_hidden().await? {
            return Ok(Verdict::inapplicable(
                "This element is not an SVG graphic with an image role in the accessibility tree.",
                "RC2",
            ));
        }

        if svg_name(element).await?.is_some() {
            Ok(Verdict::passed("This element has an accessible name.", "RC3"))
        } else {
            Ok(Verdict::failed(
                "This element doesn't have an accessible name.",
                "RC4",
            ))
        }
    }
}

/// Non-empty accessible name of an SVG element.
///
/// Uses the computed name when the page supplies one, else `aria-label`, then
/// the text of a direct `<title>` child.
async fn svg_name(element: &dyn Element) -> Result<Option<String>, RuleError> {
    let non_empty = |name: Option<String>| name.filter(|n| !n.trim().is_empty());

    if let Some(name) = non_empty(element.accessible_name().await?) {
        return Ok(Some(name));
    }
    if let Some(label) = non_empty(element.attribute("aria-label").await?) {
        return Ok(Some(label));
    }
    for child in element.children().await? {
        if child.tag_name().await?.eq_ignore_ascii_case("title") {
            return Ok(non_empty(Some(child.text().await?)));
        }
    }
    Ok(None)
}
