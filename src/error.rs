//! Error types for the temperature service client.

use thiserror::Error;
use uuid::Uuid;

/// Errors returned by [`TemperatureService`](crate::TemperatureService) and
/// the transport bindings.
#[derive(Debug, Error)]
pub enum Error {
    /// The service does not expose the requested characteristic
    #[error("characteristic {0} not found")]
    CharacteristicNotFound(Uuid),

    /// A characteristic value was shorter than the field being decoded
    #[error("payload too short: expected {expected} bytes, got {actual}")]
    ShortPayload { expected: usize, actual: usize },

    /// Failure reported by the host Bluetooth stack, passed through as-is
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
