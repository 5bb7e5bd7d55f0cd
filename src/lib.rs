//! Schnorr zero-knowledge identification and signatures over prime-modulus groups.
//!
//! A prover convinces a verifier that it knows `x` with `y = g^x mod p`
//! without revealing `x`:
//!
//! 1. Prover commits to `t = g^r mod p` for a fresh nonce `r`
//! 2. Verifier replies with a random challenge `c`
//! 3. Prover responds with `s = r + c*x`
//! 4. Verifier accepts iff `g^s = t * y^c mod p`
//!
//! [`Signer`] and [`SignatureVerifier`] make the protocol non-interactive
//! with the Fiat-Shamir transform: the challenge is squeezed from a Merlin
//! transcript of the public values, and the result is a signature `(c, s)`
//! over a message, with `s` reduced modulo the exponent modulus.
//!
//! # Example
//!
//! ```rust
//! use schnorr_zkp::{GroupParameters, KeyPair, Prover, SecureRng, Verifier};
//!
//! let params = GroupParameters::rfc5114_2048_256();
//! let mut rng = SecureRng::new();
//! let keys = KeyPair::random(&params, &mut rng).unwrap();
//!
//! let mut verifier = Verifier::new(params.clone(), keys.public_key().clone()).unwrap();
//! let mut prover = Prover::new(params, keys);
//!
//! let commitment = prover.commit(&mut rng).unwrap();
//! let challenge = verifier.challenge(&mut rng, &commitment).unwrap();
//! let response = prover.respond(&challenge).unwrap();
//!
//! assert!(verifier.verify(&commitment, &response).is_ok());
//! ```
//!
//! # Features
//!
//! - `sessions` (default): [`sessions::SessionManager`], an async registry
//!   of per-session verifiers built on tokio

/// Error types.
pub mod error;
/// Groups, keys, randomness, messages and transcripts.
pub mod primitives;
/// Interactive protocol, signatures, simulator and configuration.
pub mod protocol;
#[cfg(feature = "sessions")]
pub mod sessions;

pub use error::Error;
pub use primitives::{
    sample_range, Challenge, Commitment, GroupParameters, KeyPair, PublicKey, Response, SecretKey,
    SecureRng, Signature, Transcript,
};
pub use protocol::{
    sign, simulate, verify, verify_transcript, Phase, ProtocolConfig, Prover, ResponseReduction,
    SessionLimits, SignatureVerifier, Signer, SimulatedTranscript, Verifier,
};

/// Result type for Schnorr protocol operations.
pub type Result<T> = core::result::Result<T, Error>;
