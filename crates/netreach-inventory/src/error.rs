use netreach_types::ParseError;

/// A rule record that cannot be turned into a domain rule.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MalformedRuleError {
    /// The record is not shaped like a rule at all.
    #[error("rule {rule}: unreadable record: {message}")]
    Shape { rule: String, message: String },

    /// A scalar field failed to parse.
    #[error("rule {rule}: {source}")]
    Field { rule: String, source: ParseError },

    #[error("rule {rule}: priority {priority} is outside 0..=65535")]
    Priority { rule: String, priority: i64 },

    /// A required field is missing or contradicts another.
    #[error("rule {rule}: {message}")]
    Incomplete { rule: String, message: String },
}

/// Failure reported by an inventory source.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("failed to read inventory snapshot {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode inventory snapshot {path}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to assemble the policy chain of one (project, network).
///
/// Cloneable so a failed resolution can be memoized for the rest of a run.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("cannot fetch ancestry of project {project}: {message}")]
    Ancestry { project: String, message: String },

    #[error("cannot fetch firewall policy of {node}: {message}")]
    Policy { node: String, message: String },

    #[error("cannot fetch networks of project {project}: {message}")]
    Network { project: String, message: String },

    #[error("network {network} not found in project {project}")]
    NetworkNotFound { project: String, network: String },

    #[error("cannot fetch firewall rules of project {project}: {message}")]
    Rules { project: String, message: String },

    #[error("malformed rule in policy {policy}: {source}")]
    MalformedRule {
        policy: String,
        source: MalformedRuleError,
    },
}
