//! Stable identifiers for rules and precondition gates.
//!
//! Rule codes are the internal `QW-ACT-R<n>` form. External ids are the
//! canonical ACT rules identifiers published at <https://act-rules.github.io>.

// Rule codes
pub const RULE_HTML_HAS_TITLE: &str = "QW-ACT-R1";
pub const RULE_HTML_HAS_LANG: &str = "QW-ACT-R2";
pub const RULE_LANG_XML_LANG_MATCH: &str = "QW-ACT-R3";
pub const RULE_META_REFRESH_NO_DELAY: &str = "QW-ACT-R4";
pub const RULE_HTML_LANG_VALID: &str = "QW-ACT-R5";
pub const RULE_ORIENTATION_NOT_RESTRICTED: &str = "QW-ACT-R7";
pub const RULE_IMAGE_FILENAME_NAME: &str = "QW-ACT-R8";
pub const RULE_META_VIEWPORT_ZOOM: &str = "QW-ACT-R14";
pub const RULE_NO_AUTOPLAY_AUDIO: &str = "QW-ACT-R15";
pub const RULE_ID_UNIQUE: &str = "QW-ACT-R18";
pub const RULE_SVG_IMAGE_NAME: &str = "QW-ACT-R21";
pub const RULE_SCROLLABLE_KEYBOARD: &str = "QW-ACT-R43";

// External ACT rule ids
pub const ACT_HTML_HAS_TITLE: &str = "2779a5";
pub const ACT_HTML_HAS_LANG: &str = "b5c3f8";
pub const ACT_LANG_XML_LANG_MATCH: &str = "5b7ae0";
pub const ACT_META_REFRESH_NO_DELAY: &str = "bc659a";
pub const ACT_HTML_LANG_VALID: &str = "bf051a";
pub const ACT_ORIENTATION_NOT_RESTRICTED: &str = "b33eff";
pub const ACT_IMAGE_FILENAME_NAME: &str = "9eb3f6";
pub const ACT_META_VIEWPORT_ZOOM: &str = "b4f0c3";
pub const ACT_NO_AUTOPLAY_AUDIO: &str = "80f0bf";
pub const ACT_ID_UNIQUE: &str = "3ea0c8";
pub const ACT_SVG_IMAGE_NAME: &str = "7d6734";
pub const ACT_SCROLLABLE_KEYBOARD: &str = "0ssw9k";

// Result codes emitted when a precondition gate rejects the candidate.
pub const GATE_ELEMENT_EXISTS: &str = "gate.element_exists";
pub const GATE_HAS_ATTRIBUTE: &str = "gate.has_attribute";
pub const GATE_HAS_NON_EMPTY_ATTRIBUTE: &str = "gate.has_non_empty_attribute";
pub const GATE_HAS_ATTRIBUTE_VALUE: &str = "gate.has_attribute_value";
pub const GATE_IS_DOCUMENT: &str = "gate.is_document";
pub const GATE_NOT_SPECIAL_DOCUMENT: &str = "gate.not_special_document";
pub const GATE_LANG_SUBTAG_VALID: &str = "gate.lang_subtag_valid";
pub const GATE_NOT_IFRAME: &str = "gate.not_iframe";
