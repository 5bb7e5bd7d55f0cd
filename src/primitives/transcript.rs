//! Fiat-Shamir transcript for non-interactive proofs.
//!
//! Provides domain-separated, transcript-based challenge generation using Merlin.
//!
//! # Canonical encoding
//!
//! Framing is Merlin's: every appended field is absorbed into the STROBE
//! state together with its label and length, so field boundaries cannot
//! shift. The transcript is created under a protocol label and a protocol
//! domain tag.
//!
//! Integers are written fixed-width big-endian, the width being the byte
//! length of `p`. Messages are raw bytes. Signing appends, in order: any
//! caller contexts, `p`, `g`, `y`, `t`, then the message.
//!
//! Challenges are squeezed with `challenge_bytes` to `bits(bound) + 128`
//! bits, read big-endian and reduced modulo the bound.

use merlin::Transcript as MerlinTranscript;
use num_bigint::BigUint;
use zeroize::Zeroize;

use super::group::GroupParameters;
use super::keys::PublicKey;

/// Protocol label for transcript initialization.
const PROTOCOL_LABEL: &[u8] = b"Schnorr ZKP v1.0.0";

/// Domain separation tag for protocol name.
const PROTOCOL_DST: &[u8] = b"schnorr-modp";

/// Domain separation tag for challenge generation.
const CHALLENGE_DST: &[u8] = b"challenge";

/// Number of extra bits for statistical security in challenge reduction (128 bits).
const EXTRA_SECURITY_BITS: u64 = 128;

/// Transcript wrapper for Fiat-Shamir transformation.
///
/// Cloning a transcript forks it: both copies continue from the same state.
#[derive(Clone)]
pub struct Transcript(MerlinTranscript);

impl Transcript {
    /// Creates a new transcript for the Schnorr protocol.
    pub fn new() -> Self {
        let mut transcript = MerlinTranscript::new(PROTOCOL_LABEL);
        transcript.append_message(b"protocol", PROTOCOL_DST);
        Self(transcript)
    }

    /// Appends a labeled byte string.
    pub fn append_message(&mut self, label: &'static [u8], message: &[u8]) {
        self.0.append_message(label, message);
    }

    /// Appends application-specific context to prevent cross-protocol attacks.
    ///
    /// # Security
    ///
    /// This should be called before generating proofs in application-specific
    /// contexts to ensure proofs from one context cannot be replayed in another.
    /// Examples: session ID, domain separator, purpose string.
    pub fn append_context(&mut self, context: &[u8]) {
        self.0.append_message(b"context", context);
    }

    /// Appends a fixed-width integer.
    pub fn append_integer(
        &mut self,
        label: &'static [u8],
        params: &GroupParameters,
        value: &BigUint,
    ) {
        let encoded = params.encode_fixed(value);
        self.0.append_message(label, &encoded);
    }

    /// Appends protocol parameters (modulus and generator) to the transcript.
    pub fn append_parameters(&mut self, params: &GroupParameters) {
        self.append_integer(b"modulus-p", params, params.p());
        self.append_integer(b"generator-g", params, params.g());
    }

    /// Appends the public key to the transcript.
    pub fn append_public_key(&mut self, params: &GroupParameters, public_key: &PublicKey) {
        self.append_integer(b"public-key", params, public_key.value());
    }

    /// Appends the commitment value to the transcript.
    pub fn append_commitment(&mut self, params: &GroupParameters, t: &BigUint) {
        self.append_integer(b"commitment", params, t);
    }

    /// Generates a challenge integer uniformly distributed in `[0, bound)`,
    /// up to a statistical distance of 2^-128.
    ///
    /// Uses extra bits (128) for statistical security in reduction.
    /// `bound` must be non-zero.
    pub fn challenge_integer(&mut self, bound: &BigUint) -> BigUint {
        let byte_len = (bound.bits() + EXTRA_SECURITY_BITS).div_ceil(8) as usize;
        let mut buf = vec![0u8; byte_len];
        self.0.challenge_bytes(CHALLENGE_DST, &mut buf);

        let challenge = BigUint::from_bytes_be(&buf) % bound;
        buf.zeroize();

        challenge
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
