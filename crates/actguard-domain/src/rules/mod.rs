//! Built-in ACT rules.

use crate::rule::Rule;

mod html_has_lang;
mod html_has_title;
mod html_lang_valid;
mod id_unique;
mod image_filename_name;
mod lang_xml_lang_match;
mod meta_refresh_no_delay;
mod meta_viewport_zoom;
mod no_autoplay_audio;
mod orientation_not_restricted;
mod scrollable_keyboard;
mod svg_image_name;

pub use html_has_lang::HtmlHasLang;
pub use html_has_title::HtmlHasTitle;
pub use html_lang_valid::HtmlLangValid;
pub use id_unique::IdUnique;
pub use image_filename_name::ImageFilenameName;
pub use lang_xml_lang_match::LangXmlLangMatch;
pub use meta_refresh_no_delay::MetaRefreshNoDelay;
pub use meta_viewport_zoom::MetaViewportZoom;
pub use no_autoplay_audio::NoAutoplayAudio;
pub use orientation_not_restricted::OrientationNotRestricted;
pub use scrollable_keyboard::ScrollableKeyboard;
pub use svg_image_name::SvgImageName;

/// One instance of every built-in rule, in code order.
pub fn builtin() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(HtmlHasTitle),
        Box::new(HtmlHasLang),
        Box::new(LangXmlLangMatch),
        Box::new(MetaRefreshNoDelay),
        Box::new(HtmlLangValid),
        Box::new(OrientationNotRestricted),
        Box::new(ImageFilenameName),
        Box::new(MetaViewportZoom),
        Box::new(NoAutoplayAudio),
        Box::new(IdUnique),
        Box::new(SvgImageName),
        Box::new(ScrollableKeyboard),
    ]
}
