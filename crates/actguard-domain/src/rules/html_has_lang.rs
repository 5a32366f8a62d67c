use crate::error::RuleError;
use crate::model::{Element, RuleContext};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_HTML_HAS_LANG,
    external_id: ids::ACT_HTML_HAS_LANG,
    name: "HTML page has lang attribute",
    description: "This rule checks that the html element has a non-empty lang attribute.",
    target: &["html"],
    success_criteria: &[Criterion::new(
        "3.1.1",
        Level::A,
        Principle::Understandable,
        "https://www.w3.org/WAI/WCAG21/Understanding/language-of-page",
    )],
};

const GATES: &[Precondition] = &[
    Precondition::ElementExists,
    Precondition::IsDocument("html"),
    Precondition::IsNotSpecialDocument,
];

#[derive(Debug, Default)]
pub struct HtmlHasLang;

#[async_trait(?Send)]
impl Rule for HtmlHasLang {
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
        let lang = element.attribute("lang").await?;
        Ok(match lang {
            Some(value) if !value.trim().is_empty() => Verdict::passed(
                "The `html` element has a non-empty `lang` attribute.",
                "RC1",
            ),
            Some(_) => Verdict::failed("The `lang` attribute of the `html` element is empty.", "RC2"),
            None => Verdict::failed("The `html` element doesn't have a `lang` attribute.", "RC3"),
        })
    }
}
