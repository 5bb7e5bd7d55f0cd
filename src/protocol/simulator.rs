use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::verifier::verify_transcript;
use crate::primitives::sample_range;
use crate::{Challenge, Commitment, Error, GroupParameters, PublicKey, Response, Result};

/// An accepting transcript `(t, c, s)` produced without the secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedTranscript {
    commitment: Commitment,
    challenge: Challenge,
    response: Response,
}

impl SimulatedTranscript {
    /// Returns the commitment `t`.
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    /// Returns the challenge `c`.
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    /// Returns the response `s`.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Checks the transcript against `public_key`.
    pub fn verify(&self, params: &GroupParameters, public_key: &PublicKey) -> bool {
        verify_transcript(
            params,
            public_key.value(),
            self.commitment.t(),
            self.challenge.c(),
            self.response.s(),
        )
    }
}

/// Simulates an honest run for `public_key`.
///
/// Picks `c` in `[0, bound - 1]` and `s` in `[1, n - 1]` first, then solves
/// for `t = g^s * y^(-c) mod p`. The result is distributed like a real
/// transcript with reduced responses, which is why honest-verifier
/// transcripts reveal nothing about `x`.
///
/// # Errors
///
/// - [`Error::InvalidGroupElement`] if the public key is not a group element
/// - [`Error::InvalidParameters`] if `bound` is zero
/// - [`Error::RandomnessUnavailable`] if sampling fails
pub fn simulate<R: CryptoRngCore>(
    rng: &mut R,
    params: &GroupParameters,
    public_key: &PublicKey,
    bound: &BigUint,
) -> Result<SimulatedTranscript> {
    params.validate_element(public_key.value())?;
    if *bound == BigUint::from(0u32) {
        return Err(Error::InvalidParameters(
            "Challenge bound must be positive".to_string(),
        ));
    }

    let c = sample_range(rng, &BigUint::from(0u32), &(bound - 1u32))?;
    let upper = params.exponent_modulus() - 1u32;
    let s = sample_range(rng, &BigUint::from(1u32), &upper)?;
    let t = params.mul(&params.exp_g(&s), &params.exp_inverse(public_key.value(), &c));
    debug!("simulated transcript");

    Ok(SimulatedTranscript {
        commitment: Commitment::new(t),
        challenge: Challenge::new(c),
        response: Response::new(s),
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::KeyPair;

    #[test]
    fn simulated_transcripts_verify() {
        let mut rng = StdRng::seed_from_u64(30);
        let params = GroupParameters::new(BigUint::from(23u32), BigUint::from(5u32)).unwrap();
        let keys = KeyPair::from_secret(&params, BigUint::from(6u32)).unwrap();
        let bound = params.exponent_modulus();

        for _ in 0..50 {
            let transcript = simulate(&mut rng, &params, keys.public_key(), &bound).unwrap();
            assert!(transcript.challenge().c() < &bound);
            assert!(transcript.verify(&params, keys.public_key()));
        }
    }

    #[test]
    fn simulation_in_subgroup() {
        let mut rng = StdRng::seed_from_u64(31);
        let params = GroupParameters::rfc5114_2048_256();
        let keys = KeyPair::random(&params, &mut rng).unwrap();
        let bound = params.exponent_modulus();

        let transcript = simulate(&mut rng, &params, keys.public_key(), &bound).unwrap();
        assert!(params.validate_element(transcript.commitment().t()).is_ok());
        assert!(transcript.verify(&params, keys.public_key()));
    }

    #[test]
    fn zero_bound_rejected() {
        let mut rng = StdRng::seed_from_u64(32);
        let params = GroupParameters::new(BigUint::from(23u32), BigUint::from(5u32)).unwrap();
        let keys = KeyPair::from_secret(&params, BigUint::from(6u32)).unwrap();
        assert!(simulate(&mut rng, &params, keys.public_key(), &BigUint::from(0u32)).is_err());
    }
}
