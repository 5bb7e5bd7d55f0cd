use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::{Phase, ProtocolConfig};
use crate::primitives::sample_range;
use crate::{Challenge, Commitment, Error, GroupParameters, PublicKey, Response, Result};

/// Verifier for the interactive Schnorr identification protocol.
///
/// One instance runs one protocol instance: it validates the prover's
/// commitment, issues a random challenge and checks the response against
/// `g^s = t * y^c mod p`.
pub struct Verifier {
    params: GroupParameters,
    public_key: PublicKey,
    challenge_bound: BigUint,
    state: VerifierState,
}

enum VerifierState {
    Init,
    Challenged {
        commitment: Commitment,
        challenge: Challenge,
    },
    Verified,
    Rejected,
}

impl VerifierState {
    fn phase(&self) -> Phase {
        match self {
            VerifierState::Init => Phase::Init,
            VerifierState::Challenged { .. } => Phase::Challenged,
            VerifierState::Verified => Phase::Verified,
            VerifierState::Rejected => Phase::Rejected,
        }
    }
}

impl Verifier {
    /// Creates a verifier for `public_key`, challenging over the full
    /// exponent modulus.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidGroupElement`] if the public key is not a group element.
    pub fn new(params: GroupParameters, public_key: PublicKey) -> Result<Self> {
        Self::with_config(params, public_key, &ProtocolConfig::default())
    }

    /// Creates a verifier whose challenge bound follows `config`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `config` does not validate
    /// - [`Error::InvalidGroupElement`] if the public key is not a group element
    pub fn with_config(
        params: GroupParameters,
        public_key: PublicKey,
        config: &ProtocolConfig,
    ) -> Result<Self> {
        config.validate()?;
        params.validate_element(public_key.value())?;
        let challenge_bound = config.challenge_bound(&params)?;

        Ok(Self {
            params,
            public_key,
            challenge_bound,
            state: VerifierState::Init,
        })
    }

    /// Narrows challenges to `[0, bound - 1]`.
    ///
    /// A cheating prover succeeds with probability `1 / bound`; small bounds
    /// are only useful to measure that.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameters`] unless `2 <= bound <= n`.
    pub fn with_challenge_bound(mut self, bound: BigUint) -> Result<Self> {
        if bound < BigUint::from(2u32) || bound > self.params.exponent_modulus() {
            return Err(Error::InvalidParameters(
                "Challenge bound must satisfy 2 <= bound <= n".to_string(),
            ));
        }
        self.challenge_bound = bound;
        Ok(self)
    }

    /// Returns the public key being verified against.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns the exclusive upper bound of issued challenges.
    pub fn challenge_bound(&self) -> &BigUint {
        &self.challenge_bound
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Whether the last response was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self.state, VerifierState::Verified)
    }

    /// Interactive protocol: issues the challenge (second message).
    ///
    /// # Errors
    ///
    /// - [`Error::ProtocolOrder`] unless the verifier is fresh
    /// - [`Error::InvalidGroupElement`] if `t` is not a group element
    /// - [`Error::RandomnessUnavailable`] if sampling fails
    pub fn challenge<R: CryptoRngCore>(
        &mut self,
        rng: &mut R,
        commitment: &Commitment,
    ) -> Result<Challenge> {
        self.ensure_init()?;

        let upper = &self.challenge_bound - 1u32;
        let c = sample_range(rng, &BigUint::from(0u32), &upper)?;
        self.challenge_with(commitment, Challenge::new(c))
    }

    /// Issues a caller-chosen challenge. Only for fixed test vectors.
    pub(crate) fn challenge_with(
        &mut self,
        commitment: &Commitment,
        challenge: Challenge,
    ) -> Result<Challenge> {
        self.ensure_init()?;
        self.params.validate_element(commitment.t())?;

        self.state = VerifierState::Challenged {
            commitment: commitment.clone(),
            challenge: challenge.clone(),
        };
        debug!(phase = %Phase::Challenged, "verifier issued challenge");

        Ok(challenge)
    }

    fn ensure_init(&self) -> Result<()> {
        let actual = self.phase();
        if actual != Phase::Init {
            warn!(%actual, "challenge requested out of order");
            return Err(Error::ProtocolOrder {
                expected: Phase::Init,
                actual,
            });
        }
        Ok(())
    }

    /// Interactive protocol: checks the response (final step).
    ///
    /// # Errors
    ///
    /// - [`Error::ProtocolOrder`] unless a challenge is outstanding
    /// - [`Error::VerificationFailed`] if the commitment differs from the one
    ///   challenged or `g^s != t * y^c mod p`
    pub fn verify(&mut self, commitment: &Commitment, response: &Response) -> Result<()> {
        let (expected, challenge) = match &self.state {
            VerifierState::Challenged {
                commitment,
                challenge,
            } => (commitment, challenge),
            other => {
                let actual = other.phase();
                warn!(%actual, "verify called without an outstanding challenge");
                return Err(Error::ProtocolOrder {
                    expected: Phase::Challenged,
                    actual,
                });
            }
        };

        let accepted = expected == commitment
            && check_equation(
                &self.params,
                self.public_key.value(),
                commitment.t(),
                challenge.c(),
                response.s(),
            );

        if accepted {
            self.state = VerifierState::Verified;
            debug!(phase = %Phase::Verified, "proof accepted");
            Ok(())
        } else {
            self.state = VerifierState::Rejected;
            warn!(phase = %Phase::Rejected, "proof rejected");
            Err(Error::VerificationFailed)
        }
    }

    /// Returns the verifier to `Init` for another run against the same key.
    pub fn reset(&mut self) {
        self.state = VerifierState::Init;
    }
}

/// Checks a complete transcript `(t, c, s)` against `y` without any state.
///
/// Returns `false` if `y` or `t` is not a group element.
pub fn verify_transcript(
    params: &GroupParameters,
    y: &BigUint,
    t: &BigUint,
    c: &BigUint,
    s: &BigUint,
) -> bool {
    if params.validate_element(y).is_err() || params.validate_element(t).is_err() {
        return false;
    }
    check_equation(params, y, t, c, s)
}

fn check_equation(
    params: &GroupParameters,
    y: &BigUint,
    t: &BigUint,
    c: &BigUint,
    s: &BigUint,
) -> bool {
    let lhs = params.exp_g(s);
    let rhs = params.mul(t, &params.exp(y, c));

    params
        .encode_fixed(&lhs)
        .ct_eq(&params.encode_fixed(&rhs))
        .into()
}
