use crate::{model::ActguardConfigV1, presets};
use actguard_domain::ConfigureOptions;
use actguard_types::{Level, Principle};
use anyhow::Context;

/// Command-line overrides. A non-empty list replaces the file's list.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub principles: Vec<String>,
    pub levels: Vec<String>,
    pub rules: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub profile: String,
    pub options: ConfigureOptions,
}

pub fn resolve_config(
    cfg: ActguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::DEFAULT_PROFILE.to_string());

    let mut options = presets::preset(&profile)?;

    // file then command line; later non-empty lists win
    for layer in [
        (cfg.principles, cfg.levels, cfg.rules),
        (overrides.principles, overrides.levels, overrides.rules),
    ] {
        let (principles, levels, rules) = layer;
        if !principles.is_empty() {
            options.principles = principles;
        }
        if !levels.is_empty() {
            options.levels = levels;
        }
        if !rules.is_empty() {
            options.rules = rules;
        }
    }

    for principle in &options.principles {
        Principle::parse(principle)
            .with_context(|| format!("unknown principle: {principle}"))?;
    }
    for level in &options.levels {
        Level::parse(level).with_context(|| format!("unknown level: {level} (expected A|AA|AAA)"))?;
    }

    Ok(ResolvedConfig { profile, options })
}
