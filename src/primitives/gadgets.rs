//! Protocol gadgets for Schnorr identification and signatures.
//!
//! This module contains the messages exchanged by the protocol:
//! commitment, challenge, response and the non-interactive signature.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::group::MAX_MODULUS_BITS;
use crate::{Error, Result};

/// Signature format version for serialization compatibility.
const SIGNATURE_VERSION: u8 = 1;

/// Largest accepted encoded integer inside a signature (bytes). Both `c`
/// and `s` are below the exponent modulus, hence below `p`.
const MAX_INTEGER_SIZE: usize = MAX_MODULUS_BITS.div_ceil(8) as usize;

/// Commitment value in the Schnorr protocol.
///
/// First message from prover: `t = g^r` for a fresh random `r`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment {
    t: BigUint,
}

impl Commitment {
    /// Creates a new commitment from the commitment value.
    pub fn new(t: BigUint) -> Self {
        Self { t }
    }

    /// Returns the commitment value `t = g^r`.
    pub fn t(&self) -> &BigUint {
        &self.t
    }
}

/// Challenge issued by the verifier (or derived from the transcript).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Challenge {
    c: BigUint,
}

impl Challenge {
    /// Creates a challenge from its value.
    pub fn new(c: BigUint) -> Self {
        Self { c }
    }

    /// Returns the challenge value `c`.
    pub fn c(&self) -> &BigUint {
        &self.c
    }
}

/// Response value in the Schnorr protocol.
///
/// Prover's response to challenge: `s = r + c*x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response {
    s: BigUint,
}

impl Response {
    /// Creates a new response from its value.
    pub fn new(s: BigUint) -> Self {
        Self { s }
    }

    /// Returns the response value `s`.
    pub fn s(&self) -> &BigUint {
        &self.s
    }
}

/// Non-interactive Schnorr signature `(c, s)`.
///
/// The commitment `t` is not carried; verifiers recompute it as
/// `g^s * y^(-c)` and re-derive the challenge.
///
/// # Serialization
///
/// Signatures can be serialized to bytes using [`Signature::to_bytes`] and
/// deserialized using [`Signature::from_bytes`]. The format is versioned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    challenge: Challenge,
    response: Response,
}

impl Signature {
    /// Creates a signature from its challenge and response.
    pub fn new(challenge: Challenge, response: Response) -> Self {
        Self {
            challenge,
            response,
        }
    }

    /// Returns the challenge `c`.
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    /// Returns the response `s`.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Serializes the signature to bytes.
    ///
    /// Format: `[version (1 byte)][c_len (4 bytes)][c][s_len (4 bytes)][s]`,
    /// integers big-endian without padding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let c_bytes = self.challenge.c().to_bytes_be();
        let s_bytes = self.response.s().to_bytes_be();

        let mut result = Vec::with_capacity(1 + 4 + c_bytes.len() + 4 + s_bytes.len());
        result.push(SIGNATURE_VERSION);

        result.extend_from_slice(&(c_bytes.len() as u32).to_be_bytes());
        result.extend_from_slice(&c_bytes);

        result.extend_from_slice(&(s_bytes.len() as u32).to_be_bytes());
        result.extend_from_slice(&s_bytes);

        result
    }

    /// Deserializes a signature from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        const MIN_SIGNATURE_SIZE: usize = 1 + 4 + 1 + 4 + 1;

        if bytes.len() < MIN_SIGNATURE_SIZE {
            return Err(Error::Serialization(format!(
                "Signature too small: {} bytes",
                bytes.len()
            )));
        }

        let version = bytes[0];
        if version != SIGNATURE_VERSION {
            return Err(Error::Serialization(format!(
                "Unsupported signature version: {version}"
            )));
        }

        let mut pos = 1;
        let c = read_integer(bytes, &mut pos, "c")?;
        let s = read_integer(bytes, &mut pos, "s")?;

        if pos != bytes.len() {
            return Err(Error::Serialization(format!(
                "Signature has {} trailing bytes",
                bytes.len() - pos
            )));
        }

        Ok(Self::new(Challenge::new(c), Response::new(s)))
    }

    /// Hex-encodes [`Signature::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decodes a signature produced by [`Signature::to_hex`].
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded)?;
        Self::from_bytes(&bytes)
    }
}

fn read_integer(bytes: &[u8], pos: &mut usize, name: &str) -> Result<BigUint> {
    let len_end = *pos + 4;
    let len_bytes: [u8; 4] = bytes
        .get(*pos..len_end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| Error::Serialization(format!("Truncated signature: missing {name} length")))?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    *pos = len_end;

    if len == 0 || len > MAX_INTEGER_SIZE {
        return Err(Error::Serialization(format!("Invalid {name} length: {len}")));
    }

    let data = bytes
        .get(*pos..*pos + len)
        .ok_or_else(|| Error::Serialization(format!("Truncated signature: incomplete {name} data")))?;
    *pos += len;

    Ok(BigUint::from_bytes_be(data))
}
