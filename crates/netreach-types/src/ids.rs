//! Stable strings that appear in user-facing explanations and configuration.

// Explanations
pub const IMPLICIT_DEFAULT: &str = "implicit default";
pub const MATCHED_BY_POLICY: &str = "policy";
pub const MATCHED_BY_RULE: &str = "rule";
pub const MATCHED_BY_VPC_RULE: &str = "vpc firewall rule";

// Profiles
pub const PROFILE_DEFAULT: &str = "default";
pub const PROFILE_STRICT: &str = "strict";

// Tie-break modes
pub const TIE_BREAK_NUMERIC: &str = "numeric";
pub const TIE_BREAK_HIERARCHY_FIRST: &str = "hierarchy_first";

// Malformed rule handling
pub const MALFORMED_DROP: &str = "drop";
pub const MALFORMED_REJECT: &str = "reject";

/// Priorities accepted for a rule (inclusive).
pub const PRIORITY_MIN: i64 = 0;
pub const PRIORITY_MAX: i64 = 65535;

/// Priority assumed when a record omits one (the platform default).
pub const DEFAULT_PRIORITY: u16 = 1000;
