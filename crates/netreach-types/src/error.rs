/// Failure to read one scalar field of an inventory record into its typed form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid address range: {0}")]
    InvalidRange(String),

    #[error("invalid port or port range: {0}")]
    InvalidPort(String),

    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("unknown direction: {0} (expected ingress or egress)")]
    UnknownDirection(String),

    #[error("unknown action: {0} (expected allow or deny)")]
    UnknownAction(String),
}
