use crate::error::RuleError;
use crate::lang::is_valid_primary_subtag;
use crate::model::{Element, RuleContext};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_HTML_LANG_VALID,
    external_id: ids::ACT_HTML_LANG_VALID,
    name: "HTML lang attribute is valid",
    description: "This rule checks that the lang attribute of the root element of a page has a valid primary language subtag.",
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
    Precondition::HasNonEmptyAttribute("lang"),
];

#[derive(Debug, Default)]
pub struct HtmlLangValid;

#[async_trait(?Send)]
impl Rule for HtmlLangValid {
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
        let lang = element.attribute("lang").await?.unwrap_or_default();
        if is_valid_primary_subtag(&lang) {
            Ok(Verdict::passed(
                "The `lang` attribute has a valid primary language subtag.",
                "RC1",
            ))
        } else {
            Ok(Verdict::failed(
                format!("The `lang` attribute `{}` doesn't start with a valid language subtag.", lang.trim()),
                "RC2",
            ))
        }
    }
}
