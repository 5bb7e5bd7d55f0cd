//! Error types for Schnorr identification and signatures.

use crate::protocol::Phase;

/// Main error types for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid group parameters were provided.
    #[error("Invalid group parameters: {0}")]
    InvalidParameters(String),

    /// A scalar value is invalid or out of range.
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// A group element is invalid or not in the correct subgroup.
    #[error("Invalid group element: {0}")]
    InvalidGroupElement(String),

    /// An operation was invoked out of the protocol's state-machine order.
    #[error("Protocol order violation: expected {expected}, found {actual}")]
    ProtocolOrder {
        /// Phase the operation requires.
        expected: Phase,
        /// Phase the participant was actually in.
        actual: Phase,
    },

    /// The verification equation did not hold.
    #[error("Verification failed")]
    VerificationFailed,

    /// The randomness source failed or never produced a usable value.
    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    /// Encoded data could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A capacity limit was reached.
    #[error("Capacity exceeded: {0}")]
    Capacity(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` for outcomes that are expected during normal operation
    /// (a rejected proof, a call in the wrong phase).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::VerificationFailed | Error::ProtocolOrder { .. })
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Serialization(err.to_string())
    }
}
