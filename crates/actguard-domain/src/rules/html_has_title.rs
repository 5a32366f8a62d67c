use crate::error::RuleError;
use crate::model::{Element, ElementRef, RuleContext};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_HTML_HAS_TITLE,
    external_id: ids::ACT_HTML_HAS_TITLE,
    name: "HTML Page has a title",
    description: "This rule checks that the HTML page has a title.",
    target: &["html"],
    success_criteria: &[Criterion::new(
        "2.4.2",
        Level::A,
        Principle::Operable,
        "https://www.w3.org/WAI/WCAG21/Understanding/page-titled",
    )],
};

const GATES: &[Precondition] = &[
    Precondition::ElementExists,
    Precondition::IsDocument("html"),
    Precondition::IsNotSpecialDocument,
];

#[derive(Debug, Default)]
pub struct HtmlHasTitle;

#[async_trait(?Send)]
impl Rule for HtmlHasTitle {
    fn descriptor(&self) -> &RuleDescriptor {
        &DESCRIPTOR
    }

    fn preconditions(&self) -> &[Precondition] {
        GATES
    }

    async fn evaluate(
        &self,
        _element: &dyn Element,
        ctx: &RuleContext<'_>,
    ) -> Result<Verdict, RuleError> {
        let mut first = None;
        for title in ctx.document.select("title").await? {
            if !inside_svg(&title).await? {
                first = Some(title);
                break;
            }
        }
        let Some(first) = first else {
            return Ok(Verdict::failed(
                "The page doesn't have a `title` element.",
                "RC2",
            ));
        };
        if first.text().await?.trim().is_empty() {
            return Ok(Verdict::failed(
                "The first `title` element of the page is empty.",
                "RC3",
            ));
        }
        Ok(Verdict::passed(
            "The page has a non-empty `title` element.",
            "RC1",
        ))
    }
}

/// SVG `<title>` elements name graphics, not the page.
async fn inside_svg(element: &ElementRef) -> Result<bool, RuleError> {
    let mut current = element.parent().await?;
    while let Some(ancestor) = current {
        if ancestor.tag_name().await?.eq_ignore_ascii_case("svg") {
            return Ok(true);
        }
        current = ancestor.parent().await?;
    }
    Ok(false)
}
