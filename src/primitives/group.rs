//! Prime-modulus multiplicative groups.
//!
//! A [`GroupParameters`] value holds the modulus `p`, the generator `g` and,
//! when known, the prime order `q` of the subgroup `g` generates. All
//! exponent arithmetic is done modulo the *exponent modulus*: `q` when it is
//! known, `p - 1` otherwise.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use super::rng::sample_range;
use crate::{Error, Result};

/// Miller-Rabin rounds used by [`GroupParameters::validate`].
const PRIMALITY_ROUNDS: usize = 40;

/// Smallest modulus accepted. Below this the nonce range `[1, p - 2]` is
/// too small to hide anything.
const MIN_MODULUS: u32 = 5;

/// Largest modulus accepted, in bits. Bounds every encoded integer.
pub(crate) const MAX_MODULUS_BITS: u64 = 16_384;

/// Public parameters of the group the protocol runs in.
///
/// # Security
///
/// Construction only checks cheap range conditions. Callers accepting
/// parameters from an untrusted party must call [`GroupParameters::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GroupParametersRepr")]
pub struct GroupParameters {
    p: BigUint,
    g: BigUint,
    q: Option<BigUint>,
}

/// Unchecked wire shape; deserialization goes through the constructors.
#[derive(Deserialize)]
struct GroupParametersRepr {
    p: BigUint,
    g: BigUint,
    q: Option<BigUint>,
}

impl TryFrom<GroupParametersRepr> for GroupParameters {
    type Error = Error;

    fn try_from(repr: GroupParametersRepr) -> Result<Self> {
        match repr.q {
            Some(q) => Self::with_order(repr.p, q, repr.g),
            None => Self::new(repr.p, repr.g),
        }
    }
}

impl GroupParameters {
    /// Creates parameters from a modulus and a generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameters`] if `p` is even or below 5, or if
    /// `g` is not in `(1, p)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use num_bigint::BigUint;
    /// use schnorr_zkp::GroupParameters;
    ///
    /// let params = GroupParameters::new(BigUint::from(23u32), BigUint::from(5u32)).unwrap();
    /// assert!(GroupParameters::new(BigUint::from(4u32), BigUint::from(2u32)).is_err());
    /// ```
    pub fn new(p: BigUint, g: BigUint) -> Result<Self> {
        Self::check_modulus(&p)?;
        Self::check_generator(&p, &g)?;
        Ok(Self { p, g, q: None })
    }

    /// Creates parameters for a generator of known prime order `q`.
    ///
    /// The order is trusted until [`GroupParameters::validate`] is called.
    pub fn with_order(p: BigUint, q: BigUint, g: BigUint) -> Result<Self> {
        Self::check_modulus(&p)?;
        Self::check_generator(&p, &g)?;

        if q <= BigUint::one() || q >= p {
            return Err(Error::InvalidParameters(
                "Subgroup order must satisfy 1 < q < p".to_string(),
            ));
        }

        Ok(Self { p, g, q: Some(q) })
    }

    /// The 2048-bit MODP group with 256-bit prime order subgroup from RFC 5114 §2.3.
    pub fn rfc5114_2048_256() -> Self {
        Self {
            p: parse_hex(RFC5114_P),
            g: parse_hex(RFC5114_G),
            q: Some(parse_hex(RFC5114_Q)),
        }
    }

    fn check_modulus(p: &BigUint) -> Result<()> {
        if *p < BigUint::from(MIN_MODULUS) {
            return Err(Error::InvalidParameters(format!(
                "Modulus must be at least {MIN_MODULUS}"
            )));
        }
        if !p.bit(0) {
            return Err(Error::InvalidParameters(
                "Modulus must be an odd prime".to_string(),
            ));
        }
        if p.bits() > MAX_MODULUS_BITS {
            return Err(Error::InvalidParameters(format!(
                "Modulus must be at most {MAX_MODULUS_BITS} bits"
            )));
        }
        Ok(())
    }

    fn check_generator(p: &BigUint, g: &BigUint) -> Result<()> {
        if *g <= BigUint::one() || g >= p {
            return Err(Error::InvalidParameters(
                "Generator must satisfy 1 < g < p".to_string(),
            ));
        }
        Ok(())
    }

    /// Runs the expensive checks: primality of `p` (and `q`), and the order
    /// of `g`.
    ///
    /// With a known order this checks `q | p - 1` and `g^q = 1`. Without one,
    /// only order-2 generators (`g = p - 1`) can be ruled out.
    pub fn validate<R: CryptoRngCore>(&self, rng: &mut R) -> Result<()> {
        if !is_probable_prime(&self.p, PRIMALITY_ROUNDS, rng)? {
            return Err(Error::InvalidParameters("Modulus is not prime".to_string()));
        }

        if self.exp(&self.g, &BigUint::from(2u32)).is_one() {
            return Err(Error::InvalidParameters(
                "Generator has order 2".to_string(),
            ));
        }

        if let Some(q) = &self.q {
            if !is_probable_prime(q, PRIMALITY_ROUNDS, rng)? {
                return Err(Error::InvalidParameters(
                    "Subgroup order is not prime".to_string(),
                ));
            }
            if !((&self.p - 1u32) % q).is_zero() {
                return Err(Error::InvalidParameters(
                    "Subgroup order does not divide p - 1".to_string(),
                ));
            }
            if !self.exp(&self.g, q).is_one() {
                return Err(Error::InvalidParameters(
                    "Generator does not have order q".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Returns the prime modulus `p`.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Returns the generator `g`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Returns the order of `g`, if it was supplied.
    pub fn order(&self) -> Option<&BigUint> {
        self.q.as_ref()
    }

    /// Modulus for exponent arithmetic: `q` if known, else `p - 1`.
    pub fn exponent_modulus(&self) -> BigUint {
        match &self.q {
            Some(q) => q.clone(),
            None => &self.p - 1u32,
        }
    }

    /// Byte width of an element in the canonical fixed-width encoding.
    pub fn element_len(&self) -> usize {
        self.p.bits().div_ceil(8) as usize
    }

    /// Computes `base^e mod p`.
    pub fn exp(&self, base: &BigUint, e: &BigUint) -> BigUint {
        base.modpow(e, &self.p)
    }

    /// Computes `g^e mod p`.
    pub fn exp_g(&self, e: &BigUint) -> BigUint {
        self.g.modpow(e, &self.p)
    }

    /// Computes `a * b mod p`.
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    /// Computes `base^(-e) mod p` using `base^(n - e mod n)`, which holds for
    /// any element of the subgroup of exponent modulus `n`.
    pub fn exp_inverse(&self, base: &BigUint, e: &BigUint) -> BigUint {
        let n = self.exponent_modulus();
        let reduced = e % &n;
        if reduced.is_zero() {
            return BigUint::one();
        }
        self.exp(base, &(n - reduced))
    }

    /// Checks that `e` is a valid group element: `1 <= e < p`, and `e^q = 1`
    /// when the order is known.
    pub fn validate_element(&self, e: &BigUint) -> Result<()> {
        if e.is_zero() || *e >= self.p {
            return Err(Error::InvalidGroupElement(
                "Element must satisfy 0 < e < p".to_string(),
            ));
        }

        if let Some(q) = &self.q {
            if !self.exp(e, q).is_one() {
                return Err(Error::InvalidGroupElement(
                    "Element is not in the correct subgroup".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Encodes an integer as fixed-width big-endian bytes of [`Self::element_len`].
    ///
    /// Values wider than the modulus (unreduced responses) keep their full
    /// width instead of being truncated.
    pub fn encode_fixed(&self, value: &BigUint) -> Vec<u8> {
        let raw = value.to_bytes_be();
        let width = self.element_len();
        if raw.len() >= width {
            return raw;
        }
        let mut out = vec![0u8; width - raw.len()];
        out.extend_from_slice(&raw);
        out
    }
}

/// Miller-Rabin probabilistic primality test.
pub(crate) fn is_probable_prime<R: CryptoRngCore>(
    n: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> Result<bool> {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if *n < two {
        return Ok(false);
    }
    if *n == two || *n == three {
        return Ok(true);
    }
    if !n.bit(0) {
        return Ok(false);
    }

    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    let upper = n - 2u32;

    'witness: for _ in 0..rounds {
        let a = sample_range(rng, &two, &upper)?;
        let mut x = a.modpow(&d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return Ok(false);
    }

    Ok(true)
}

fn parse_hex(digits: &str) -> BigUint {
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .unwrap_or_else(|| unreachable!("RFC 5114 constants are valid hex"))
}

const RFC5114_P: &str = "87A8E61DB4B6663CFFBBD19C651959998CEEF608660DD0F25D2CEED4435E3B00E00DF8F1D61957D4FAF7DF4561B2AA3016C3D91134096FAA3BF4296D830E9A7C209E0C6497517ABD5A8A9D306BCF67ED91F9E6725B4758C022E0B1EF4275BF7B6C5BFC11D45F9088B941F54EB1E59BB8BC39A0BF12307F5C4FDB70C581B23F76B63ACAE1CAA6B7902D52526735488A0EF13C6D9A51BFA4AB3AD8347796524D8EF6A167B5A41825D967E144E5140564251CCACB83E6B486F6B3CA3F7971506026C0B857F689962856DED4010ABD0BE621C3A3960A54E710C375F26375D7014103A4B54330C198AF126116D2276E11715F693877FAD7EF09CADB094AE91E1A1597";

const RFC5114_Q: &str = "8CF83642A709A097B447997640129DA299B1A47D1EB3750BA308B0FE64F5FBD3";

const RFC5114_G: &str = "3FB32C9B73134D0B2E77506660EDBD484CA7B18F21EF205407F4793A1A0BA12510DBC15077BE463FFF4FED4AAC0BB555BE3A6C1B0C6B47B1BC3773BF7E8C6F62901228F8C28CBB18A55AE31341000A650196F931C77A57F2DDF463E5E9EC144B777DE62AAAB8A8628AC376D282D6ED3864E67982428EBC831D14348F6F2F9193B5045AF2767164E1DFC967C1FB3F2E55A4BD1BFFE83B9C80D052B985D182EA0ADB2A3B7313D3FE14C8484B1E052588B9B7D2BBD2DF016199ECD06E1557CD0915B3353BBB64E0EC377FD028370DF92B52C7891428CDC67EB6184B523D1DB246C32F63078490F00EF8D647D148D47954515E2327CFEF98C582664B4C0F6CC41659";
