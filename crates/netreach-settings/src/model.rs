use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `netreach.toml` schema v1.
///
/// This is a *user-facing* config model: values stay strings here and are validated during
/// resolution, so error messages can name the offending key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NetreachConfigV1 {
    /// Optional schema string for tooling (`netreach.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `default` or `strict`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Ordering of equal-priority matches: `numeric` or `hierarchy_first`.
    ///
    /// `hierarchy_first` lets an earlier scope's allow beat a later scope's deny at the same
    /// priority; deny only wins ties within one policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_break: Option<String>,

    /// What to do with unparsable rule records: `drop` or `reject`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub malformed_rules: Option<String>,
}
