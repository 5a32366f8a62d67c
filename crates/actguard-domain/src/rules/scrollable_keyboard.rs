use crate::error::{ProviderError, RuleError};
use crate::model::{Element, ElementRef, RuleContext};
use crate::precondition::{Gate, Precondition};
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

const SCROLLING_OVERFLOW: &[&str] = &["auto", "clip", "scroll"];

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_SCROLLABLE_KEYBOARD,
    external_id: ids::ACT_SCROLLABLE_KEYBOARD,
    name: "Scrollable element is keyboard accessible",
    description: "This rule checks that scrollable elements or their descendants can be reached through sequential focus navigation so that they can be scrolled by keyboard.",
    target: &["body *"],
    success_criteria: &[Criterion::new(
        "2.1.1",
        Level::A,
        Principle::Operable,
        "https://www.w3.org/WAI/WCAG21/Understanding/keyboard",
    )],
};

/// Iframes scroll their own browsing context.
#[derive(Debug)]
struct NotIframe;

#[async_trait(?Send)]
impl Gate for NotIframe {
    async fn check(
        &self,
        element: Option<&dyn Element>,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Verdict>, ProviderError> {
        let Some(element) = element else {
            return Ok(None);
        };
        if element.tag_name().await? == "iframe" {
            return Ok(Some(Verdict::inapplicable(
                "The element is an `iframe`.",
                ids::GATE_NOT_IFRAME,
            )));
        }
        Ok(None)
    }
}

const GATES: &[Precondition] = &[Precondition::ElementExists, Precondition::Custom(&NotIframe)];

#[derive(Debug, Default)]
pub struct ScrollableKeyboard;

#[async_trait(?Send)]
impl Rule for ScrollableKeyboard {
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
        if !is_scrollable(element).await? {
            return Ok(Verdict::inapplicable(
                "The element is not scrollable.",
                "RC1",
            ));
        }

        if reaches_focus_navigation(element).await? {
            Ok(Verdict::passed(
                "The scrollable element or one of its descendants is in sequential focus navigation.",
                "RC2",
            ))
        } else {
            Ok(Verdict::failed(
                "Neither the scrollable element nor its descendants are in sequential focus navigation.",
                "RC3",
            ))
        }
    }
}

async fn is_scrollable(element: &dyn Element) -> Result<bool, ProviderError> {
    let mut has_visible_child = false;
    for child in element.children().await? {
        if is_visible(child.as_ref()).await? {
            has_visible_child = true;
            break;
        }
    }
    if !has_visible_child {
        return Ok(false);
    }

    let mut overflows = false;
    for property in ["overflow", "overflow-x", "overflow-y"] {
        if let Some(value) = element.computed_style(property).await?
            && SCROLLING_OVERFLOW.contains(&value.trim())
        {
            overflows = true;
            break;
        }
    }
    if !overflows {
        return Ok(false);
    }

    let Some(geometry) = element.geometry().await? else {
        return Ok(false);
    };
    let width = geometry.scroll_width - geometry.client_width;
    let height = geometry.scroll_height - geometry.client_height;

    let padding_left = padding(element, "padding-left").await?;
    let padding_right = padding(element, "padding-right").await?;
    let padding_top = padding(element, "padding-top").await?;
    let padding_bottom = padding(element, "padding-bottom").await?;

    Ok(width > padding_left || width > padding_right || height > padding_top || height > padding_bottom)
}

async fn is_visible(element: &dyn Element) -> Result<bool, ProviderError> {
    if element.is_hidden().await? {
        return Ok(false);
    }
    let display = element.computed_style("display").await?;
    let visibility = element.computed_style("visibility").await?;
    Ok(display.as_deref() != Some("none") && visibility.as_deref() != Some("hidden"))
}

/// Padding in CSS pixels; unknown or unparsable values count as zero.
async fn padding(element: &dyn Element, property: &str) -> Result<f64, ProviderError> {
    let value = element.computed_style(property).await?.unwrap_or_default();
    let value = value.trim();
    Ok(value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse()
        .unwrap_or(0.0))
}

/// The element or any descendant is focusable.
async fn reaches_focus_navigation(element: &dyn Element) -> Result<bool, ProviderError> {
    if element.is_focusable().await? {
        return Ok(true);
    }
    let mut stack: Vec<ElementRef> = element.children().await?;
    while let Some(node) = stack.pop() {
        if node.is_focusable().await? {
            return Ok(true);
        }
        stack.extend(node.children().await?);
    }
    Ok(false)
}
