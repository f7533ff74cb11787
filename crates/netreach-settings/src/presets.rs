use netreach_domain::config::{EffectiveConfig, MalformedRules, TieBreak};
use netreach_types::ids;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything else belongs in explicit config keys.
pub fn preset(profile: &str) -> anyhow::Result<EffectiveConfig> {
    match profile {
        ids::PROFILE_DEFAULT => Ok(default_profile()),
        ids::PROFILE_STRICT => Ok(strict_profile()),
        other => anyhow::bail!(
            "unknown profile: {other} (expected '{}' or '{}')",
            ids::PROFILE_DEFAULT,
            ids::PROFILE_STRICT
        ),
    }
}

fn default_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: ids::PROFILE_DEFAULT.to_string(),
        tie_break: TieBreak::Numeric,
        malformed_rules: MalformedRules::Drop,
    }
}

fn strict_profile() -> EffectiveConfig {
    // Strict refuses to evaluate a network whose rule data is partly unreadable.
    EffectiveConfig {
        profile: ids::PROFILE_STRICT.to_string(),
        tie_break: TieBreak::Numeric,
        malformed_rules: MalformedRules::Reject,
    }
}
