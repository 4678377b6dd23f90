//! Error types for the surrogate layer

use crate::validation::ValidationError;

/// Errors returned when writing through a surrogate to its host object.
///
/// Reads never fail: a stale surrogate simply yields `None`. Writes report
/// why they had no effect so callers can tell a rejected value apart from a
/// host object that no longer exists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurrogateError {
    /// The host object behind this surrogate has been destroyed
    #[error("host object for {0} no longer exists")]
    HostGone(&'static str),

    /// The host object exists but does not expose the required module
    #[error("host object does not expose {0}")]
    CapabilityMissing(&'static str),

    /// The value was rejected by the property's validation rules
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
