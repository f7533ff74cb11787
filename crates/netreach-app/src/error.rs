use netreach_inventory::ResolutionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The requested network (or its project) is absent from the inventory.
    #[error("network {network} not found in project {project}")]
    NotFound { project: String, network: String },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("invalid rule name pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
