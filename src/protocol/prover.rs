use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{Phase, ProtocolConfig, ResponseReduction};
use crate::primitives::sample_range;
use crate::{Challenge, Commitment, Error, GroupParameters, KeyPair, PublicKey, Response, Result};

/// Prover for the interactive Schnorr identification protocol.
///
/// Proves knowledge of `x` such that `y = g^x mod p` without revealing `x`.
/// Each protocol run is `commit` followed by `respond`; the prover tracks its
/// phase and refuses calls made out of order.
///
/// # Security
///
/// - A fresh nonce is sampled on every `commit` and destroyed by `respond`
/// - A second `commit` before `respond` fails instead of replacing the nonce
///   under a commitment the verifier may already hold
/// - Use one prover per concurrent session
pub struct Prover {
    params: GroupParameters,
    keypair: KeyPair,
    reduction: ResponseReduction,
    state: ProverState,
}

enum ProverState {
    Init,
    Committed {
        nonce: Nonce,
        commitment: Commitment,
    },
    Responded,
}

impl ProverState {
    fn phase(&self) -> Phase {
        match self {
            ProverState::Init => Phase::Init,
            ProverState::Committed { .. } => Phase::Committed,
            ProverState::Responded => Phase::Responded,
        }
    }
}

impl Prover {
    /// Creates a new prover with the given parameters and key pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use num_bigint::BigUint;
    /// use schnorr_zkp::{GroupParameters, KeyPair, Prover, SecureRng};
    ///
    /// let params = GroupParameters::new(BigUint::from(23u32), BigUint::from(5u32)).unwrap();
    /// let mut rng = SecureRng::new();
    /// let keys = KeyPair::random(&params, &mut rng).unwrap();
    ///
    /// let prover = Prover::new(params, keys);
    /// ```
    pub fn new(params: GroupParameters, keypair: KeyPair) -> Self {
        Self::with_config(params, keypair, &ProtocolConfig::default())
    }

    /// Creates a prover that follows `config` (response reduction).
    pub fn with_config(params: GroupParameters, keypair: KeyPair, config: &ProtocolConfig) -> Self {
        Self {
            params,
            keypair,
            reduction: config.response_reduction,
            state: ProverState::Init,
        }
    }

    /// Returns the public key being proven.
    pub fn public_key(&self) -> &PublicKey {
        self.keypair.public_key()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Returns the outstanding commitment, if any.
    pub fn commitment(&self) -> Option<&Commitment> {
        match &self.state {
            ProverState::Committed { commitment, .. } => Some(commitment),
            _ => None,
        }
    }

    /// Interactive protocol: generates commitment (first message).
    ///
    /// Samples a fresh nonce `r` in `[1, n - 1]` and returns `t = g^r mod p`.
    ///
    /// # Errors
    ///
    /// - [`Error::ProtocolOrder`] if a commitment is already outstanding
    /// - [`Error::RandomnessUnavailable`] if sampling fails
    pub fn commit<R: CryptoRngCore>(&mut self, rng: &mut R) -> Result<Commitment> {
        self.ensure_can_commit()?;

        let upper = self.params.exponent_modulus() - 1u32;
        let r = sample_range(rng, &BigUint::from(1u32), &upper)?;
        self.commit_with_nonce(Nonce::from_biguint(&r))
    }

    /// Commits to a caller-chosen nonce. Only for fixed test vectors.
    pub(crate) fn commit_with_nonce(&mut self, nonce: Nonce) -> Result<Commitment> {
        self.ensure_can_commit()?;

        let commitment = Commitment::new(self.params.exp_g(&nonce.to_biguint()));
        self.state = ProverState::Committed {
            nonce,
            commitment: commitment.clone(),
        };
        debug!(phase = %Phase::Committed, "prover committed");

        Ok(commitment)
    }

    fn ensure_can_commit(&self) -> Result<()> {
        if let ProverState::Committed { .. } = self.state {
            warn!("commit called with a commitment outstanding");
            return Err(Error::ProtocolOrder {
                expected: Phase::Init,
                actual: Phase::Committed,
            });
        }
        Ok(())
    }

    /// Interactive protocol: generates response (third message).
    ///
    /// Computes `s = r + c*x` for the outstanding nonce, which is consumed.
    ///
    /// # Errors
    ///
    /// [`Error::ProtocolOrder`] unless a commitment is outstanding.
    pub fn respond(&mut self, challenge: &Challenge) -> Result<Response> {
        let state = core::mem::replace(&mut self.state, ProverState::Responded);
        let nonce = match state {
            ProverState::Committed { nonce, .. } => nonce,
            other => {
                let actual = other.phase();
                self.state = other;
                warn!(%actual, "respond called without an outstanding commitment");
                return Err(Error::ProtocolOrder {
                    expected: Phase::Committed,
                    actual,
                });
            }
        };

        let s = compute_response(
            &self.params,
            self.reduction,
            &nonce,
            challenge.c(),
            &self.keypair.secret().to_biguint(),
        );
        debug!(phase = %Phase::Responded, "prover responded");

        Ok(Response::new(s))
    }

    /// Abandons the current run, destroying any outstanding nonce.
    pub fn reset(&mut self) {
        self.state = ProverState::Init;
    }
}

/// Computes `s = r + c*x`, reduced according to `reduction`.
pub(crate) fn compute_response(
    params: &GroupParameters,
    reduction: ResponseReduction,
    nonce: &Nonce,
    c: &BigUint,
    x: &BigUint,
) -> BigUint {
    let s = nonce.to_biguint() + c * x;
    reduction.apply(params, s)
}

/// Secret nonce used in the commitment phase.
///
/// Automatically zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct Nonce {
    r: Vec<u8>,
}

impl Nonce {
    pub(crate) fn from_biguint(r: &BigUint) -> Self {
        Self { r: r.to_bytes_be() }
    }

    pub(crate) fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.r)
    }
}
