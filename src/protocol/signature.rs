use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use zeroize::Zeroize;

use super::prover::{compute_response, Nonce};
use super::ResponseReduction;
use crate::primitives::rng::fill_random;
use crate::{
    Challenge, Error, GroupParameters, KeyPair, PublicKey, Response, Result, Signature, Transcript,
};

/// Domain separation tag for nonce derivation.
const NONCE_DST: &[u8] = b"schnorr-nonce";

/// Length of the fresh randomness mixed into hedged nonces.
const AUX_LEN: usize = 32;

/// Produces non-interactive Schnorr signatures (Fiat-Shamir transform).
///
/// # Nonces
///
/// Nonces are derived from the transcript, the secret, 32 fresh random bytes,
/// the public key and the message. A broken RNG therefore cannot make two
/// different messages share a nonce, and [`Signer::sign_deterministic`]
/// needs no RNG at all.
///
/// # Canonical form
///
/// Responses are always reduced modulo the exponent modulus `n`, and
/// [`SignatureVerifier`] rejects `s >= n`, so `(c, s + k*n)` is never a
/// second valid signature.
pub struct Signer {
    params: GroupParameters,
    keypair: KeyPair,
}

impl Signer {
    /// Creates a signer for `keypair`.
    pub fn new(params: GroupParameters, keypair: KeyPair) -> Self {
        Self { params, keypair }
    }

    /// Returns the public key signatures verify under.
    pub fn public_key(&self) -> &PublicKey {
        self.keypair.public_key()
    }

    /// Signs `message` with a hedged nonce.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schnorr_zkp::{GroupParameters, KeyPair, SecureRng, SignatureVerifier, Signer};
    ///
    /// let params = GroupParameters::rfc5114_2048_256();
    /// let mut rng = SecureRng::new();
    /// let keys = KeyPair::random(&params, &mut rng).unwrap();
    /// let verifier = SignatureVerifier::new(params.clone(), keys.public_key().clone()).unwrap();
    ///
    /// let signer = Signer::new(params, keys);
    /// let signature = signer.sign(&mut rng, b"hello").unwrap();
    /// assert!(verifier.verify(b"hello", &signature).is_ok());
    /// ```
    pub fn sign<R: CryptoRngCore>(&self, rng: &mut R, message: &[u8]) -> Result<Signature> {
        let mut transcript = Transcript::new();
        self.sign_with_transcript(rng, message, &mut transcript)
    }

    /// Signs `message` over a caller-prepared transcript.
    ///
    /// Context appended to `transcript` beforehand (session ids, purpose
    /// strings) is bound into the signature; the verifier must append the
    /// same context before calling [`SignatureVerifier::verify_with_transcript`].
    pub fn sign_with_transcript<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        message: &[u8],
        transcript: &mut Transcript,
    ) -> Result<Signature> {
        let mut aux = [0u8; AUX_LEN];
        fill_random(rng, &mut aux)?;
        let nonce = self.derive_nonce(transcript, &aux, message);
        aux.zeroize();

        self.sign_with_nonce(nonce, message, transcript)
    }

    /// Signs `message` with a nonce derived from the key and message alone.
    ///
    /// Signing the same message twice yields the same signature.
    pub fn sign_deterministic(&self, message: &[u8]) -> Result<Signature> {
        let mut transcript = Transcript::new();
        let nonce = self.derive_nonce(&transcript, &[], message);
        self.sign_with_nonce(nonce, message, &mut transcript)
    }

    pub(crate) fn sign_with_nonce(
        &self,
        nonce: Nonce,
        message: &[u8],
        transcript: &mut Transcript,
    ) -> Result<Signature> {
        let t = self.params.exp_g(&nonce.to_biguint());
        let c = derive_challenge(&self.params, self.public_key(), &t, message, transcript);
        let s = compute_response(
            &self.params,
            ResponseReduction::ModOrder,
            &nonce,
            &c,
            &self.keypair.secret().to_biguint(),
        );
        debug!(message_len = message.len(), "message signed");

        Ok(Signature::new(Challenge::new(c), Response::new(s)))
    }

    /// Maps a fork of `transcript` into `[1, n - 1]`.
    fn derive_nonce(&self, transcript: &Transcript, aux: &[u8], message: &[u8]) -> Nonce {
        let mut fork = transcript.clone();
        fork.append_message(b"nonce-domain", NONCE_DST);
        fork.append_parameters(&self.params);
        fork.append_message(b"secret", self.keypair.secret().as_bytes());
        fork.append_message(b"aux", aux);
        fork.append_public_key(&self.params, self.public_key());
        fork.append_message(b"message", message);

        let range = self.params.exponent_modulus() - 1u32;
        let r = fork.challenge_integer(&range) + 1u32;
        Nonce::from_biguint(&r)
    }
}

/// Absorbs `p, g, y, t, message` and extracts `c` in `[0, n - 1]`.
fn derive_challenge(
    params: &GroupParameters,
    public_key: &PublicKey,
    t: &BigUint,
    message: &[u8],
    transcript: &mut Transcript,
) -> BigUint {
    transcript.append_parameters(params);
    transcript.append_public_key(params, public_key);
    transcript.append_commitment(params, t);
    transcript.append_message(b"message", message);
    transcript.challenge_integer(&params.exponent_modulus())
}

/// Verifies Schnorr signatures under a single public key.
pub struct SignatureVerifier {
    params: GroupParameters,
    public_key: PublicKey,
}

impl SignatureVerifier {
    /// Creates a verifier for `public_key`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidGroupElement`] if the public key is not a group element.
    pub fn new(params: GroupParameters, public_key: PublicKey) -> Result<Self> {
        params.validate_element(public_key.value())?;
        Ok(Self { params, public_key })
    }

    /// Returns the public key signatures are checked against.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Verifies `signature` over `message`.
    ///
    /// Returns `Ok(())` if the signature is valid, [`Error::VerificationFailed`]
    /// otherwise.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        let mut transcript = Transcript::new();
        self.verify_with_transcript(message, signature, &mut transcript)
    }

    /// Verifies a signature made with [`Signer::sign_with_transcript`].
    ///
    /// The transcript must match the one used during signing.
    pub fn verify_with_transcript(
        &self,
        message: &[u8],
        signature: &Signature,
        transcript: &mut Transcript,
    ) -> Result<()> {
        let c = signature.challenge().c();
        let s = signature.response().s();

        let n = self.params.exponent_modulus();
        if *c >= n {
            warn!("signature challenge out of range");
            return Err(Error::VerificationFailed);
        }
        if *s >= n {
            warn!("signature response not in canonical form");
            return Err(Error::VerificationFailed);
        }

        // t' = g^s * y^(-c)
        let t = self.params.mul(
            &self.params.exp_g(s),
            &self.params.exp_inverse(self.public_key.value(), c),
        );
        let expected = derive_challenge(&self.params, &self.public_key, &t, message, transcript);

        let matches: bool = self
            .params
            .encode_fixed(&expected)
            .ct_eq(&self.params.encode_fixed(c))
            .into();

        if matches {
            debug!(message_len = message.len(), "signature accepted");
            Ok(())
        } else {
            warn!("signature rejected");
            Err(Error::VerificationFailed)
        }
    }
}

/// Signs `message` with `keypair`. See [`Signer::sign`].
pub fn sign<R: CryptoRngCore>(
    rng: &mut R,
    message: &[u8],
    keypair: &KeyPair,
    params: &GroupParameters,
) -> Result<Signature> {
    Signer::new(params.clone(), keypair.clone()).sign(rng, message)
}

/// Returns whether `signature` is valid for `message` under `public_key`.
///
/// An invalid public key yields `false`.
pub fn verify(
    message: &[u8],
    signature: &Signature,
    public_key: &PublicKey,
    params: &GroupParameters,
) -> bool {
    SignatureVerifier::new(params.clone(), public_key.clone())
        .and_then(|verifier| verifier.verify(message, signature))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn toy() -> GroupParameters {
        GroupParameters::new(BigUint::from(23u32), BigUint::from(5u32)).unwrap()
    }

    fn toy_signer() -> Signer {
        let params = toy();
        let keys = KeyPair::from_secret(&params, BigUint::from(6u32)).unwrap();
        Signer::new(params, keys)
    }

    fn verifier_for(signer: &Signer) -> SignatureVerifier {
        SignatureVerifier::new(toy(), signer.public_key().clone()).unwrap()
    }

    #[test]
    fn fixed_nonce_signature() {
        let signer = toy_signer();
        let nonce = Nonce::from_biguint(&BigUint::from(13u32));
        let signature = signer
            .sign_with_nonce(nonce, b"hello", &mut Transcript::new())
            .unwrap();

        let c = signature.challenge().c();
        assert!(c < &BigUint::from(22u32));
        assert_eq!(
            signature.response().s(),
            &((BigUint::from(13u32) + c * 6u32) % 22u32)
        );
        verifier_for(&signer).verify(b"hello", &signature).unwrap();
    }

    #[test]
    fn sign_and_verify() {
        let mut rng = StdRng::seed_from_u64(20);
        let signer = toy_signer();
        let verifier = verifier_for(&signer);

        for message in [&b""[..], b"a", b"hello", b"a longer message to sign"] {
            let signature = signer.sign(&mut rng, message).unwrap();
            verifier.verify(message, &signature).unwrap();
        }
    }

    #[test]
    fn deterministic_signatures_repeat() {
        let signer = toy_signer();
        let first = signer.sign_deterministic(b"hello").unwrap();
        let second = signer.sign_deterministic(b"hello").unwrap();
        assert_eq!(first, second);
        verifier_for(&signer).verify(b"hello", &first).unwrap();
    }

    #[test]
    fn responses_are_reduced() {
        let mut rng = StdRng::seed_from_u64(21);
        let signer = toy_signer();
        let verifier = verifier_for(&signer);

        for _ in 0..20 {
            let signature = signer.sign(&mut rng, b"hello").unwrap();
            assert!(signature.response().s() < &BigUint::from(22u32));
            verifier.verify(b"hello", &signature).unwrap();
        }
    }

    #[test]
    fn shifted_response_rejected() {
        let signer = toy_signer();
        let verifier = verifier_for(&signer);
        let signature = signer.sign_deterministic(b"hello").unwrap();

        // g^(s + n) = g^s, so only the range check stops this.
        let shifted = Signature::new(
            signature.challenge().clone(),
            Response::new(signature.response().s() + 22u32),
        );
        assert!(matches!(
            verifier.verify(b"hello", &shifted),
            Err(Error::VerificationFailed)
        ));
    }

    #[test]
    fn out_of_range_challenge_rejected() {
        let signer = toy_signer();
        let verifier = verifier_for(&signer);
        let signature = signer.sign_deterministic(b"hello").unwrap();

        let shifted = Signature::new(
            Challenge::new(signature.challenge().c() + 22u32),
            signature.response().clone(),
        );
        assert!(matches!(
            verifier.verify(b"hello", &shifted),
            Err(Error::VerificationFailed)
        ));
    }

    #[test]
    fn transcript_context_is_bound() {
        let mut rng = StdRng::seed_from_u64(22);
        let params = GroupParameters::rfc5114_2048_256();
        let keys = KeyPair::random(&params, &mut rng).unwrap();
        let verifier = SignatureVerifier::new(params.clone(), keys.public_key().clone()).unwrap();
        let signer = Signer::new(params, keys);

        let mut signing = Transcript::new();
        signing.append_context(b"session-1");
        let signature = signer
            .sign_with_transcript(&mut rng, b"hello", &mut signing)
            .unwrap();

        let mut same = Transcript::new();
        same.append_context(b"session-1");
        verifier
            .verify_with_transcript(b"hello", &signature, &mut same)
            .unwrap();

        let mut other = Transcript::new();
        other.append_context(b"session-2");
        assert!(verifier
            .verify_with_transcript(b"hello", &signature, &mut other)
            .is_err());
        assert!(verifier.verify(b"hello", &signature).is_err());
    }

    #[test]
    fn shared_nonce_leaks_secret() {
        // Prime order 11 so challenge differences are invertible.
        let params = GroupParameters::with_order(
            BigUint::from(23u32),
            BigUint::from(11u32),
            BigUint::from(2u32),
        )
        .unwrap();
        let keys = KeyPair::from_secret(&params, BigUint::from(6u32)).unwrap();
        let signer = Signer::new(params, keys);
        let q = BigUint::from(11u32);

        let sign_fixed = |message: &[u8]| {
            signer
                .sign_with_nonce(
                    Nonce::from_biguint(&BigUint::from(7u32)),
                    message,
                    &mut Transcript::new(),
                )
                .unwrap()
        };

        // Find two messages whose challenges differ.
        let a = sign_fixed(b"first");
        let mut second = b"second".to_vec();
        let mut b = sign_fixed(&second);
        let mut counter = 0u8;
        while a.challenge() == b.challenge() {
            second.push(counter);
            counter += 1;
            b = sign_fixed(&second);
        }

        // x = (s1 - s2) / (c1 - c2) mod q.
        let ds = (a.response().s() + &q - b.response().s()) % &q;
        let dc = (a.challenge().c() + &q - b.challenge().c()) % &q;
        let dc_inv = dc.modpow(&(&q - 2u32), &q);
        assert_eq!((ds * dc_inv) % &q, BigUint::from(6u32));
    }

    #[test]
    fn free_functions() {
        let mut rng = StdRng::seed_from_u64(23);
        let params = GroupParameters::rfc5114_2048_256();
        let keys = KeyPair::random(&params, &mut rng).unwrap();

        let signature = sign(&mut rng, b"hello", &keys, &params).unwrap();
        assert!(verify(b"hello", &signature, keys.public_key(), &params));
        assert!(!verify(b"hullo", &signature, keys.public_key(), &params));

        let other = KeyPair::random(&params, &mut rng).unwrap();
        assert!(!verify(b"hello", &signature, other.public_key(), &params));
    }
}
