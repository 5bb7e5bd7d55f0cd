//! Secret/public key pairs.

use core::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::group::GroupParameters;
use super::rng::sample_range;
use crate::{Error, Result};

/// The prover's secret exponent `x`.
///
/// Stored as big-endian bytes so the long-lived copy can be wiped; it is
/// zeroized when dropped and never serialized or printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    fn from_biguint(x: &BigUint) -> Self {
        Self {
            bytes: x.to_bytes_be(),
        }
    }

    /// Returns the secret as an integer.
    pub(crate) fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.bytes)
    }

    /// Returns the raw big-endian bytes of the secret.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// The public key `y = g^x mod p`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(BigUint);

impl PublicKey {
    /// Wraps a received public key after checking it is a group element.
    pub fn new(params: &GroupParameters, y: BigUint) -> Result<Self> {
        params.validate_element(&y)?;
        Ok(Self(y))
    }

    /// Returns the key as an integer.
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl From<PublicKey> for BigUint {
    fn from(key: PublicKey) -> Self {
        key.0
    }
}

/// A secret exponent together with its public key.
///
/// # Security
///
/// - `y` is always `g^x mod p` for the parameters it was generated under
/// - The secret is only reachable inside the crate
#[derive(Clone, Debug)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl KeyPair {
    /// Builds a key pair, sampling the secret if none is supplied.
    ///
    /// Secrets are drawn from `[1, n - 1]` where `n` is the exponent modulus
    /// (`[1, p - 2]` when the group order is unknown).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidScalar`] if a supplied secret is out of range
    /// - [`Error::RandomnessUnavailable`] if sampling fails
    ///
    /// # Examples
    ///
    /// ```rust
    /// use num_bigint::BigUint;
    /// use schnorr_zkp::{GroupParameters, KeyPair, SecureRng};
    ///
    /// let params = GroupParameters::new(BigUint::from(23u32), BigUint::from(5u32)).unwrap();
    /// let mut rng = SecureRng::new();
    /// let keys = KeyPair::generate(&params, Some(BigUint::from(6u32)), &mut rng).unwrap();
    /// assert_eq!(keys.public_key().value(), &BigUint::from(8u32));
    /// ```
    pub fn generate<R: CryptoRngCore>(
        params: &GroupParameters,
        secret: Option<BigUint>,
        rng: &mut R,
    ) -> Result<Self> {
        match secret {
            Some(x) => Self::from_secret(params, x),
            None => Self::random(params, rng),
        }
    }

    /// Samples a fresh secret and derives its public key.
    pub fn random<R: CryptoRngCore>(params: &GroupParameters, rng: &mut R) -> Result<Self> {
        let upper = params.exponent_modulus() - 1u32;
        let x = sample_range(rng, &BigUint::from(1u32), &upper)?;
        Self::from_secret(params, x)
    }

    /// Derives the key pair for a known secret.
    pub fn from_secret(params: &GroupParameters, x: BigUint) -> Result<Self> {
        let n = params.exponent_modulus();
        if x.is_zero() || x >= n {
            return Err(Error::InvalidScalar(
                "Secret must satisfy 1 <= x < exponent modulus".to_string(),
            ));
        }

        let y = params.exp_g(&x);
        Ok(Self {
            secret: SecretKey::from_biguint(&x),
            public: PublicKey(y),
        })
    }

    /// Returns the shareable public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }
}
