//! Applicability gates evaluated before rule-specific logic.
//!
//! A rule declares an ordered list of [`Precondition`]s. The list is checked
//! strictly left to right; the first gate that rejects the candidate decides
//! the verdict (always inapplicable) and the rule body never runs.

use crate::error::ProviderError;
use crate::lang::is_valid_primary_subtag;
use crate::model::{Element, RuleContext};
use actguard_types::{Verdict, ids};
use async_trait::async_trait;
use std::fmt;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// A rule-specific exclusion gate.
///
/// Returns `None` to let the candidate through, or the inapplicable verdict
/// that rejects it.
#[async_trait(?Send)]
pub trait Gate: fmt::Debug {
    async fn check(
        &self,
        element: Option<&dyn Element>,
        ctx: &RuleContext<'_>,
    ) -> Result<Option<Verdict>, ProviderError>;
}

#[derive(Clone, Copy, Debug)]
pub enum Precondition {
    ElementExists,
    HasAttribute(&'static str),
    HasNonEmptyAttribute(&'static str),
    /// The attribute is present and equals the value, ignoring ASCII case and
    /// surrounding whitespace.
    HasAttributeValue(&'static str, &'static str),
    /// The candidate is the root element and carries this tag.
    IsDocument(&'static str),
    /// The root is not an SVG or MathML document.
    IsNotSpecialDocument,
    /// The attribute starts with a registered primary language subtag.
    LangSubtagValid(&'static str),
    Custom(&'static dyn Gate),
}

impl Precondition {
    pub async fn check(
        &self,
        element: Option<&dyn Element>,
        ctx: &RuleContext<'_>,
    ) -> Result<Option<Verdict>, ProviderError> {
        if let Precondition::Custom(gate) = self {
            return gate.check(element, ctx).await;
        }

        let Some(element) = element else {
            return Ok(Some(self.rejection()));
        };

        let accepted = match *self {
            Precondition::ElementExists => true,
            Precondition::HasAttribute(name) => element.has_attribute(name).await?,
            Precondition::HasNonEmptyAttribute(name) => element
                .attribute(name)
                .await?
                .is_some_and(|v| !v.trim().is_empty()),
            Precondition::HasAttributeValue(name, expected) => element
                .attribute(name)
                .await?
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(expected)),
            Precondition::IsDocument(tag) => {
                element.tag_name().await?.eq_ignore_ascii_case(tag)
                    && element.parent().await?.is_none()
            }
            Precondition::IsNotSpecialDocument => !is_special_document(element).await?,
            Precondition::LangSubtagValid(name) => element
                .attribute(name)
                .await?
                .is_some_and(|v| is_valid_primary_subtag(&v)),
            Precondition::Custom(_) => true,
        };

        Ok((!accepted).then(|| self.rejection()))
    }

    fn rejection(&self) -> Verdict {
        match *self {
            Precondition::ElementExists | Precondition::Custom(_) => Verdict::inapplicable(
                "No candidate element exists in the document.",
                ids::GATE_ELEMENT_EXISTS,
            ),
            Precondition::HasAttribute(name) => Verdict::inapplicable(
                format!("The element doesn't have the `{name}` attribute."),
                ids::GATE_HAS_ATTRIBUTE,
            ),
            Precondition::HasNonEmptyAttribute(name) => Verdict::inapplicable(
                format!("The element's `{name}` attribute is missing or empty."),
                ids::GATE_HAS_NON_EMPTY_ATTRIBUTE,
            ),
            Precondition::HasAttributeValue(name, expected) => Verdict::inapplicable(
                format!("The element's `{name}` attribute is not `{expected}`."),
                ids::GATE_HAS_ATTRIBUTE_VALUE,
            ),
            Precondition::IsDocument(tag) => Verdict::inapplicable(
                format!("The element is not the `{tag}` document element."),
                ids::GATE_IS_DOCUMENT,
            ),
            Precondition::IsNotSpecialDocument => Verdict::inapplicable(
                "The document is an SVG or MathML document.",
                ids::GATE_NOT_SPECIAL_DOCUMENT,
            ),
            Precondition::LangSubtagValid(name) => Verdict::inapplicable(
                format!("The `{name}` attribute doesn't start with a valid language subtag."),
                ids::GATE_LANG_SUBTAG_VALID,
            ),
        }
    }
}

/// Run a gate list in order and return the first rejection, if any.
pub async fn check_chain(
    chain: &[Precondition],
    element: Option<&dyn Element>,
    ctx: &RuleContext<'_>,
) -> Result<Option<Verdict>, ProviderError> {
    for gate in chain {
        if let Some(rejection) = gate.check(element, ctx).await? {
            return Ok(Some(rejection));
        }
    }
    Ok(None)
}

async fn is_special_document(element: &dyn Element) -> Result<bool, ProviderError> {
    let tag = element.tag_name().await?;
    if tag.eq_ignore_ascii_case("svg") || tag.eq_ignore_ascii_case("math") {
        return Ok(true);
    }
    let namespace = element.attribute("xmlns").await?;
    Ok(namespace.is_some_and(|ns| {
        let ns = ns.trim();
        ns == SVG_NAMESPACE || ns == MATHML_NAMESPACE
    }))
}
