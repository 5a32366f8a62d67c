use actguard_domain::ConfigureOptions;
use actguard_types::Level;

pub const DEFAULT_PROFILE: &str = "full";

/// Every profile name [`preset`] accepts.
pub const PROFILES: &[&str] = &["full", "wcag-a", "wcag-aa"];

/// Preset profiles only pick conformance levels; anything finer goes in the
/// config file.
pub fn preset(profile: &str) -> anyhow::Result<ConfigureOptions> {
    let levels: &[Level] = match profile {
        "full" => &[],
        "wcag-a" => &[Level::A],
        "wcag-aa" => &[Level::A, Level::AA],
        other => anyhow::bail!(
            "unknown profile: {other} (expected one of {})",
            PROFILES.join(", ")
        ),
    };
    Ok(ConfigureOptions {
        levels: levels.iter().map(|l| l.as_str().to_string()).collect(),
        ..ConfigureOptions::default()
    })
}
