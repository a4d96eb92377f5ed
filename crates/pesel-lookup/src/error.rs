//! Error types for the lookup service.
//!
//! ## Error Cases
//! - `Lookup`: the engine rejected the request (malformed identifier, bad
//!   date fields, checksum mismatch).
//! - `ChannelError`: an internal communication failure between the caller and
//!   a worker.
//! - `RequestCancelled`: the lookup ended before a completion signal arrived.
//! - `InvalidRequest`: the request was refused before dispatch.
//! - `InvalidConfig`: the service was built from an unusable configuration.
//! - `ServiceShutdown`: a request arrived while the service was shutting down.

pub type Result<T> = core::result::Result<T, ServiceError>;

/// Unified error type for the lookup service.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum ServiceError {
    /// The engine rejected the request.
    #[error("{0}")]
    Lookup(#[from] pesel::Error),

    /// Internal channel send/receive failure (e.g., closed or full channel).
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The lookup was cancelled before it completed.
    #[error("Request cancelled")]
    RequestCancelled,

    /// The request was refused before reaching a worker.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The configuration would leave the service unable to run lookups.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// The service is in the process of shutting down.
    #[error("Service is shutting down")]
    ServiceShutdown,
}

impl ServiceError {
    /// `true` when the engine itself rejected the input, as opposed to the
    /// service failing to run it.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Lookup(_) | Self::InvalidRequest { .. })
    }
}
