use crate::error::RuleError;
use crate::model::{Element, RuleContext};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_ID_UNIQUE,
    external_id: ids::ACT_ID_UNIQUE,
    name: "id attribute value is unique",
    description: "This rule checks that all id attribute values on a single page are unique.",
    target: &["[id]"],
    success_criteria: &[Criterion::new(
        "4.1.1",
        Level::A,
        Principle::Robust,
        "https://www.w3.org/WAI/WCAG21/Understanding/parsing",
    )],
};

const GATES: &[Precondition] = &[Precondition::ElementExists];

#[derive(Debug, Default)]
pub struct IdUnique;

#[async_trait(?Send)]
impl Rule for IdUnique {
    fn descriptor(&self) -> &RuleDescriptor {
        &DESCRIPTOR
    }

    fn preconditions(&self) -> &[Precondition] {
        GATES
    }

    async fn evaluate(
        &self,
        element: &dyn Element,
        ctx: &RuleContext<'_>,
    ) -> Result<Verdict, RuleError> {
        let id = element.attribute("id").await?.unwrap_or_default();
        if id.is_empty() {
            return Ok(Verdict::inapplicable(
                "The element doesn't have a non-empty `id`.",
                "RC4",
            ));
        }

        // Compare values directly; ids may contain characters a selector
        // would have to escape.
        let mut same = 0usize;
        for other in ctx.document.select("[id]").await? {
            if other.attribute("id").await?.as_deref() == Some(id.as_str()) {
                same += 1;
            }
        }

        if same > 1 {
            Ok(Verdict::failed("Several elements have identical id.", "RC2"))
        } else {
            Ok(Verdict::passed("This element has a unique id.", "RC3"))
        }
    }
}
