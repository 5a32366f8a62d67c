use crate::error::RuleError;
use crate::lang::primary_subtag;
use crate::model::{Element, RuleContext};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_LANG_XML_LANG_MATCH,
    external_id: ids::ACT_LANG_XML_LANG_MATCH,
    name: "HTML lang and xml:lang match",
    description: "The rule checks that for the html element, there is no mismatch between the primary language in non-empty lang and xml:lang attributes, if both are used.",
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
    Precondition::HasNonEmptyAttribute("xml:lang"),
    Precondition::LangSubtagValid("lang"),
    Precondition::LangSubtagValid("xml:lang"),
];

#[derive(Debug, Default)]
pub struct LangXmlLangMatch;

#[async_trait(?Send)]
impl Rule for LangXmlLangMatch {
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
        let xml_lang = element.attribute("xml:lang").await?.unwrap_or_default();

        if primary_subtag(&lang) == primary_subtag(&xml_lang) {
            Ok(Verdict::passed(
                "The `lang` and `xml:lang` attributes have the same value.",
                "RC1",
            ))
        } else {
            Ok(Verdict::failed(
                "The `lang` and `xml:lang` attributes don't have the same value.",
                "RC2",
            ))
        }
    }
}
