//! The Schnorr identification protocol and its Fiat-Shamir signatures.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Protocol configuration and layered loading.
pub mod config;
/// Prover implementation for the interactive protocol.
pub mod prover;
/// Fiat-Shamir signing and signature verification.
pub mod signature;
/// Transcript simulator demonstrating the zero-knowledge property.
pub mod simulator;
/// Verifier implementation for the interactive protocol.
pub mod verifier;

pub use config::{ProtocolConfig, ResponseReduction, SessionLimits};
pub use prover::Prover;
pub use signature::{sign, verify, SignatureVerifier, Signer};
pub use simulator::{simulate, SimulatedTranscript};
pub use verifier::{verify_transcript, Verifier};

/// Position of a participant in the protocol state machine.
///
/// Provers move through `Init -> Committed -> Responded`, verifiers through
/// `Init -> Challenged -> Verified | Rejected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing exchanged yet.
    Init,
    /// Prover has sent a commitment.
    Committed,
    /// Verifier has issued a challenge.
    Challenged,
    /// Prover has answered the challenge.
    Responded,
    /// Verifier accepted the response.
    Verified,
    /// Verifier rejected the response.
    Rejected,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Committed => "committed",
            Phase::Challenged => "challenged",
            Phase::Responded => "responded",
            Phase::Verified => "verified",
            Phase::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
