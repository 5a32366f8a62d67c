use crate::error::RuleError;
use crate::model::{Element, RuleContext};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

/// Delays above twenty hours count as no redirect at all.
const MAX_DELAY_SECONDS: u64 = 72_000;

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_META_REFRESH_NO_DELAY,
    external_id: ids::ACT_META_REFRESH_NO_DELAY,
    name: "Meta-refresh no delay",
    description: "This rule checks that the meta element is not used for delayed redirecting or refreshing.",
    target: &["meta[http-equiv]"],
    success_criteria: &[
        Criterion::new(
            "2.2.1",
            Level::A,
            Principle::Operable,
            "https://www.w3.org/WAI/WCAG21/Understanding/timing-adjustable",
        ),
        Criterion::new(
            "2.2.4",
            Level::AAA,
            Principle::Operable,
            "https://www.w3.org/WAI/WCAG21/Understanding/interruptions",
        ),
        Criterion::new(
            "3.2.5",
            Level::AAA,
            Principle::Understandable,
            "https://www.w3.org/WAI/WCAG21/Understanding/change-on-request",
        ),
    ],
};

const GATES: &[Precondition] = &[
    Precondition::ElementExists,
    Precondition::HasNonEmptyAttribute("content"),
];

#[derive(Debug, Default)]
pub struct MetaRefreshNoDelay;

#[async_trait(?Send)]
impl Rule for MetaRefreshNoDelay {
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
        let http_equiv = element.attribute("http-equiv").await?.unwrap_or_default();
        if !http_equiv.trim().eq_ignore_ascii_case("refresh") {
            return Ok(Verdict::inapplicable(
                "The `meta` element is not a refresh directive.",
                "RC1",
            ));
        }

        let content = element.attribute("content").await?.unwrap_or_default();
        let Some(delay) = parse_refresh_delay(&content) else {
            return Ok(Verdict::inapplicable(
                "The `content` attribute is not a valid refresh value.",
                "RC2",
            ));
        };

        Ok(match delay {
            0 => Verdict::passed("The page redirects or refreshes immediately.", "RC3"),
            d if d > MAX_DELAY_SECONDS => Verdict::passed(
                "The refresh delay is longer than twenty hours.",
                "RC4",
            ),
            d => Verdict::failed(
                format!("The page redirects or refreshes after a delay of {d} seconds."),
                "RC5",
            ),
        })
    }
}

/// Whole seconds of a refresh `content` value such as `"5; url=/next"`.
///
/// The value must start with digits (optionally a fraction), followed by the
/// end of input, whitespace, `;` or `,`.
fn parse_refresh_delay(content: &str) -> Option<u64> {
    let content = content.trim_start();
    let digits_end = content
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(content.len());
    if digits_end == 0 {
        return None;
    }
    // All digits here, so the only parse failure is overflow.
    let seconds = content[..digits_end].parse::<u64>().unwrap_or(u64::MAX);

    let rest = content[digits_end..].trim_start_matches(|c: char| c == '.' || c.is_ascii_digit());
    match rest.chars().next() {
        None => Some(seconds),
        Some(c) if c == ';' || c == ',' || c.is_whitespace() => Some(seconds),
        Some(_) => None,
    }
}
