use crate::error::RuleError;
use crate::model::{Element, RuleContext};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

/// Autoplay shorter than this needs no control mechanism.
const MAX_UNCONTROLLED_SECONDS: f64 = 3.0;

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_NO_AUTOPLAY_AUDIO,
    external_id: ids::ACT_NO_AUTOPLAY_AUDIO,
    name: "audio or video has no audio that plays automatically",
    description: "This rule checks that auto-playing audio does not last for more than 3 seconds, or the audio has a control mechanism to stop or mute it.",
    target: &["audio", "video"],
    success_criteria: &[Criterion::new(
        "1.4.2",
        Level::A,
        Principle::Perceivable,
        "https://www.w3.org/WAI/WCAG21/Understanding/audio-control",
    )],
};

const GATES: &[Precondition] = &[Precondition::ElementExists];

#[derive(Debug, Default)]
pub struct NoAutoplayAudio;

#[async_trait(?Send)]
impl Rule for NoAutoplayAudio {
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
        let mut sources = Vec::new();
        for child in element.children().await? {
            if child.tag_name().await? == "source"
                && let Some(src) = child.attribute("src").await?
            {
                sources.push(src);
            }
        }
        if sources.is_empty()
            && let Some(src) = element.attribute("src").await?
        {
            sources.push(src);
        }

        let autoplay = element.has_attribute("autoplay").await?;
        let paused = element.has_attribute("paused").await?;
        let muted = element.has_attribute("muted").await?;
        if !autoplay || paused || muted || sources.is_empty() {
            return Ok(Verdict::inapplicable(
                "The element doesn't auto-play audio.",
                "RC1",
            ));
        }

        if element.has_attribute("controls").await? {
            return Ok(Verdict::passed(
                "The auto-play element has a visible control mechanism.",
                "RC2",
            ));
        }

        let short = sources.iter().all(|src| {
            media_fragment_duration(src).is_some_and(|d| d <= MAX_UNCONTROLLED_SECONDS)
        });
        if short {
            return Ok(Verdict::passed(
                "The auto-play element plays for 3 seconds or less.",
                "RC3",
            ));
        }

        Ok(Verdict::warning(
            "Check if auto-play has a visible control mechanism.",
            "RC4",
        ))
    }
}

/// Length of a `#t=start,end` temporal media fragment, in seconds.
fn media_fragment_duration(src: &str) -> Option<f64> {
    let (_, fragment) = src.split_once("#t=")?;
    let range = fragment.split('&').next()?;
    let range = range.strip_prefix("npt:").unwrap_or(range);
    let (start, end) = range.split_once(',')?;
    let start: f64 = if start.is_empty() { 0.0 } else { start.parse().ok()? };
    let end: f64 = end.parse().ok()?;
    (end >= start).then_some(end - start)
}
