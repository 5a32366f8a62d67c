use crate::error::RuleError;
use crate::model::{Element, RuleContext};
use crate::precondition::Precondition;
use crate::rule::{Criterion, Rule, RuleDescriptor};
use actguard_types::{Level, Principle, Verdict, ids};
use async_trait::async_trait;

const IMAGE_EXTENSIONS: &[&str] = &[
    "apng", "bmp", "gif", "ico", "cur", "jpg", "jpeg", "jfif", "pjpeg", "pjp", "png", "svg", "tif",
    "tiff", "webp",
];

static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: ids::RULE_IMAGE_FILENAME_NAME,
    external_id: ids::ACT_IMAGE_FILENAME_NAME,
    name: "Image filename is accessible name for image",
    description: "This rule checks that image elements that use their source filename as their accessible name do so without loss of information to the user.",
    target: &["img", "input[type=\"image\"]"],
    success_criteria: &[Criterion::new(
        "1.1.1",
        Level::A,
        Principle::Perceivable,
        "https://www.w3.org/WAI/WCAG21/Understanding/non-text-content",
    )],
};

const GATES: &[Precondition] = &[Precondition::ElementExists];

#[derive(Debug, Default)]
pub struct ImageFilenameName;

#[async_trait(?Send)]
impl Rule for ImageFilenameName {
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
        if element.is_hidden().await? {
            return Ok(Verdict::inapplicable(
                "This element is not included in the accessibility tree.",
                "RC2",
            ));
        }
        if let Some(role) = element.attribute("role").await?
            && role.trim() != "img"
        {
            return Ok(Verdict::inapplicable(
                "This element doesn't have the semantic role of image.",
                "RC3",
            ));
        }

        let Some(src) = element.attribute("src").await?.filter(|s| !s.trim().is_empty()) else {
            return Ok(Verdict::inapplicable(
                "This element doesn't have a `src` attribute.",
                "RC8",
            ));
        };
        let filename = src.trim().rsplit('/').next().unwrap_or_default().to_string();

        let name = match element.accessible_name().await? {
            Some(name) => Some(name),
            None => element.attribute("alt").await?,
        };
        if name.as_deref().map(str::trim) != Some(filename.as_str()) {
            return Ok(Verdict::inapplicable(
                "This element's accessible name is not equivalent to the file name specified in the `src` attribute.",
                "RC7",
            ));
        }

        if !has_image_extension(&filename) {
            return Ok(Verdict::passed(
                "This element's accessible name uses the filename which accurately describes the image.",
                "RC6",
            ));
        }

        let described_by_parent = match element.parent().await? {
            Some(parent) => !parent.text().await?.trim().is_empty(),
            None => false,
        };
        if described_by_parent {
            Ok(Verdict::passed(
                "This element's accessible name includes the filename but, with the text content of its parent, the image is accurately described.",
                "RC4",
            ))
        } else {
            Ok(Verdict::failed(
                "The presence of the file extension in the accessible name doesn't accurately describe the image.",
                "RC5",
            ))
        }
    }
}

/// Extension check tolerating a trailing query string.
fn has_image_extension(filename: &str) -> bool {
    let path = filename.split(['?', '#']).next().unwrap_or_default();
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}
