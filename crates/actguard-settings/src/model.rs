use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `actguard.toml` schema v1.
///
/// Permissive on purpose: unknown keys are ignored so older binaries can read
/// newer files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ActguardConfigV1 {
    /// Optional schema string for tooling (`actguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `full` (default), `wcag-a` or `wcag-aa`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// WCAG principles to keep, e.g. `["Operable"]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub principles: Vec<String>,

    /// Conformance levels to keep, e.g. `["A", "AA"]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<String>,

    /// Rule codes or ACT ids. Alone they form an allow-list; next to
    /// principles/levels they are always kept.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
}
