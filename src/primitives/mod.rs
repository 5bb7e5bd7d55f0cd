//! Core cryptographic primitives for the Schnorr protocol.
//!
//! This module contains all fundamental mathematical and cryptographic building blocks:
//! - **group**: Prime-modulus group parameters and modular arithmetic
//! - **keys**: Secret/public key pairs
//! - **rng**: Secure randomness and uniform big-integer sampling
//! - **gadgets**: Commitments, challenges, responses and signatures
//! - **transcript**: Fiat-Shamir transform for non-interactive proofs

/// Protocol messages (commitment, challenge, response, signature).
pub mod gadgets;
/// Group parameters and modular arithmetic.
pub mod group;
/// Key pairs.
pub mod keys;
/// Cryptographically secure random number generation.
pub mod rng;
/// Transcript for Fiat-Shamir transform.
pub mod transcript;

pub use gadgets::{Challenge, Commitment, Response, Signature};
pub use group::GroupParameters;
pub use keys::{KeyPair, PublicKey, SecretKey};
pub use rng::{sample_range, SecureRng};
pub use transcript::Transcript;
