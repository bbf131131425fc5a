use thiserror::Error;

/// Errors surfaced by store operations.
///
/// Payloads are plain strings so errors can live inside render snapshots
/// and cross actor channels without dragging transport types along.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("gateway unavailable: {0}")]
    UnavailableGateway(String),

    #[error("'{0}' cannot be removed")]
    NotRemovable(String),
}

impl StoreError {
    /// Wrap a transport failure, keeping only its message
    pub fn gateway(err: impl std::fmt::Display) -> Self {
        StoreError::UnavailableGateway(err.to_string())
    }
}
