//! Language tag helpers.

use language_tags::LanguageTag;

/// Primary subtag of a BCP 47 tag, lowercased. `"en-GB"` yields `"en"`.
pub fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split('-')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// True when the tag's primary subtag is a language registered in the IANA
/// language subtag registry (two-letter ISO 639-1 and three-letter ISO 639-2/3
/// codes alike).
pub fn is_valid_primary_subtag(tag: &str) -> bool {
    let primary = primary_subtag(tag);
    if primary.is_empty() || !primary.bytes().all(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    LanguageTag::parse(&primary).is_ok_and(|parsed| parsed.is_valid())
}
