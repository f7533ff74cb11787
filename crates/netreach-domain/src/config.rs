use netreach_types::ids;

/// How equal-priority matches from different scopes are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Priority, then deny before allow. Scope plays no part.
    #[default]
    Numeric,
    /// Priority, then chain position (organization first), then deny before allow.
    ///
    /// Deny no longer wins every equal-priority tie: an organization allow at
    /// 1000 beats a network deny at 1000. Only ties within one policy fall
    /// back to deny first.
    HierarchyFirst,
}

/// What the resolver does with a rule record it cannot parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedRules {
    /// Drop the rule with a warning and keep going.
    #[default]
    Drop,
    /// Fail the whole chain resolution.
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub profile: String,
    pub tie_break: TieBreak,
    pub malformed_rules: MalformedRules,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: ids::PROFILE_DEFAULT.to_string(),
            tie_break: TieBreak::Numeric,
            malformed_rules: MalformedRules::Drop,
        }
    }
}
