use crate::{Action, PolicyScope, ids};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The outcome of one reachability query.
///
/// `matched_by` is free text embedded verbatim in user-facing messages:
/// - `"implicit default"` when no rule matched
/// - `"policy: <policy>[, rule: <description>]"` for hierarchical policy rules
/// - `"vpc firewall rule: <name>"` for network-level rules
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    pub action: Action,
    pub matched_by: String,

    /// Structured view of the winning rule; absent for the implicit default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<MatchedRule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchedRule {
    pub policy: String,
    pub scope: PolicyScope,
    /// VPC rule name or hierarchical rule description (may be empty).
    pub name: String,
    pub priority: u16,
}

impl Decision {
    pub fn implicit(action: Action) -> Self {
        Self {
            action,
            matched_by: ids::IMPLICIT_DEFAULT.to_string(),
            rule: None,
        }
    }

    pub fn matched(action: Action, rule: MatchedRule) -> Self {
        Self {
            action,
            matched_by: rule.describe(),
            rule: Some(rule),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.action == Action::Allow
    }

    pub fn is_implicit(&self) -> bool {
        self.rule.is_none()
    }
}

impl MatchedRule {
    pub fn describe(&self) -> String {
        if self.scope.is_hierarchical() {
            if self.name.is_empty() {
                format!("{}: {}", ids::MATCHED_BY_POLICY, self.policy)
            } else {
                format!(
                    "{}: {}, {}: {}",
                    ids::MATCHED_BY_POLICY,
                    self.policy,
                    ids::MATCHED_BY_RULE,
                    self.name
                )
            }
        } else {
            format!("{}: {}", ids::MATCHED_BY_VPC_RULE, self.name)
        }
    }
}
