use crate::{model::NetreachConfigV1, presets};
use anyhow::Context;
use netreach_domain::config::{EffectiveConfig, MalformedRules, TieBreak};
use netreach_types::ids;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub tie_break: Option<String>,
    pub malformed_rules: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: NetreachConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| ids::PROFILE_DEFAULT.to_string());

    let mut effective = presets::preset(&profile)?;

    if let Some(tb) = overrides.tie_break.as_deref().or(cfg.tie_break.as_deref()) {
        effective.tie_break = parse_tie_break(tb).context("invalid tie_break")?;
    }

    if let Some(mr) = overrides
        .malformed_rules
        .as_deref()
        .or(cfg.malformed_rules.as_deref())
    {
        effective.malformed_rules = parse_malformed_rules(mr).context("invalid malformed_rules")?;
    }

    Ok(ResolvedConfig { effective })
}

fn parse_tie_break(v: &str) -> anyhow::Result<TieBreak> {
    match v {
        ids::TIE_BREAK_NUMERIC => Ok(TieBreak::Numeric),
        ids::TIE_BREAK_HIERARCHY_FIRST | "hierarchy-first" => Ok(TieBreak::HierarchyFirst),
        other => anyhow::bail!("unknown tie_break: {other} (expected numeric|hierarchy_first)"),
    }
}

fn parse_malformed_rules(v: &str) -> anyhow::Result<MalformedRules> {
    match v {
        ids::MALFORMED_DROP => Ok(MalformedRules::Drop),
        ids::MALFORMED_REJECT => Ok(MalformedRules::Reject),
        other => anyhow::bail!("unknown malformed_rules: {other} (expected drop|reject)"),
    }
}
