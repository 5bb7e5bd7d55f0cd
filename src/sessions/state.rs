use core::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::primitives::rng::fill_random;
use crate::{Result, Verifier};

/// Number of random bytes in a session id.
const SESSION_ID_BYTES: usize = 16;

/// Opaque identifier of an open session (hex-encoded random bytes).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Draws a fresh random session id.
    pub fn random<R: CryptoRngCore>(rng: &mut R) -> Result<Self> {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        fill_random(rng, &mut bytes)?;
        Ok(Self(hex::encode(bytes)))
    }

    /// Returns the hex form of the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A challenged verifier waiting for its response.
pub(crate) struct SessionData {
    pub(crate) verifier: Verifier,
    pub(crate) expires_at: u64,
}

impl SessionData {
    /// Wraps `verifier`, expiring `expiry_seconds` from now.
    pub(crate) fn new(verifier: Verifier, expiry_seconds: u64) -> Self {
        Self {
            verifier,
            expires_at: now().saturating_add(expiry_seconds),
        }
    }

    /// Checks if the session has expired.
    pub(crate) fn is_expired(&self) -> bool {
        now() >= self.expires_at
    }
}

/// Seconds since the Unix epoch; a clock set before 1970 reads as 0.
fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::{GroupParameters, KeyPair};

    #[test]
    fn session_ids_are_hex_and_distinct() {
        let mut rng = StdRng::seed_from_u64(40);
        let a = SessionId::random(&mut rng).unwrap();
        let b = SessionId::random(&mut rng).unwrap();

        assert_eq!(a.as_str().len(), 2 * SESSION_ID_BYTES);
        assert!(hex::decode(a.as_str()).is_ok());
        assert_ne!(a, b);
        assert_eq!(a.to_string(), a.as_str());
    }

    #[test]
    fn expiry() {
        let params = GroupParameters::new(BigUint::from(23u32), BigUint::from(5u32)).unwrap();
        let keys = KeyPair::from_secret(&params, BigUint::from(6u32)).unwrap();
        let verifier = Verifier::new(params.clone(), keys.public_key().clone()).unwrap();
        assert!(SessionData::new(verifier, 0).is_expired());

        let verifier = Verifier::new(params, keys.public_key().clone()).unwrap();
        assert!(!SessionData::new(verifier, 300).is_expired());
    }
}
