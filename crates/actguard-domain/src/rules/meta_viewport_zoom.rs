use crate::error::RuleError;
use crate::model::{Element, RuleContext};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

/// Below this `maximum-scale` users cannot zoom to 200%.
const MIN_MAXIMUM_SCALE: f64 = 2.0;

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_META_VIEWPORT_ZOOM,
    external_id: ids::ACT_META_VIEWPORT_ZOOM,
    name: "Meta viewport allows for zoom",
    description: "This rule checks that the meta element retains the user agent ability to zoom.",
    target: &["meta[name=\"viewport\"]"],
    success_criteria: &[
        Criterion::new(
            "1.4.4",
            Level::AA,
            Principle::Perceivable,
            "https://www.w3.org/WAI/WCAG21/Understanding/resize-text",
        ),
        Criterion::new(
            "1.4.10",
            Level::AA,
            Principle::Perceivable,
            "https://www.w3.org/WAI/WCAG21/Understanding/reflow",
        ),
    ],
};

const GATES: &[Precondition] = &[
    Precondition::ElementExists,
    Precondition::HasAttribute("content"),
    Precondition::HasAttributeValue("name", "viewport"),
];

#[derive(Debug, Default)]
pub struct MetaViewportZoom;

#[async_trait(?Send)]
impl Rule for MetaViewportZoom {
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
        let content = element.attribute("content").await?.unwrap_or_default();
        let viewport = ViewportZoom::parse(&content);

        if viewport.user_scalable.is_none()
            && viewport.maximum_scale.as_deref().is_none_or(is_negative)
        {
            return Ok(Verdict::passed(
                "The `meta` element with a `name=\"viewport\"` attribute doesn't define the `maximum-scale` and `user-scalable` values.",
                "RC1",
            ));
        }
        if viewport.blocks_zoom() {
            return Ok(Verdict::failed(
                "The `meta` element with a `name=\"viewport\"` attribute abolishes the user agent ability to zoom with user-scalable=no or maximum-scale < 2.",
                "RC2",
            ));
        }
        Ok(Verdict::passed(
            "The `meta` element with a `name=\"viewport\"` attribute retains the user agent ability to zoom.",
            "RC3",
        ))
    }
}

/// The zoom-related properties of a viewport `content` value such as
/// `"width=device-width, maximum-scale=1"`.
#[derive(Debug, Default, PartialEq)]
struct ViewportZoom {
    maximum_scale: Option<String>,
    user_scalable: Option<String>,
}

impl ViewportZoom {
    fn parse(content: &str) -> Self {
        let mut zoom = ViewportZoom::default();
        for item in content.split(',') {
            let Some((key, value)) = item.split_once('=') else {
                continue;
            };
            let value = value.trim().to_ascii_lowercase();
            match key.trim().to_ascii_lowercase().as_str() {
                "maximum-scale" => zoom.maximum_scale = Some(value),
                "user-scalable" => zoom.user_scalable = Some(value),
                _ => {}
            }
        }
        zoom
    }

    fn blocks_zoom(&self) -> bool {
        let no_scaling = matches!(self.user_scalable.as_deref(), Some("no" | "0"));
        let capped = self.maximum_scale.as_deref().is_some_and(|scale| {
            scale == "yes"
                || scale
                    .parse::<f64>()
                    .is_ok_and(|value| value < MIN_MAXIMUM_SCALE)
        });
        no_scaling || capped
    }
}

fn is_negative(scale: &str) -> bool {
    scale.parse::<f64>().is_ok_and(|value| value < 0.0)
}
