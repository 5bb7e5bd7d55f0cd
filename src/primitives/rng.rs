//! Cryptographically secure randomness and uniform sampling of big integers.

use num_bigint::BigUint;
use rand_core::{CryptoRng, CryptoRngCore, OsRng, RngCore};
use zeroize::Zeroize;

use crate::{Error, Result};

/// Upper bound on rejection-sampling rounds before the source is declared broken.
///
/// Each round succeeds with probability above one half, so an honest source
/// never gets close to this.
const MAX_SAMPLING_ATTEMPTS: usize = 256;

/// Cryptographically secure random number generator.
///
/// This is a thin wrapper around `OsRng` that provides a consistent interface
/// for cryptographic randomness throughout the library.
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new cryptographically secure random number generator.
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl Default for SecureRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

/// Fills `dest` from the source, surfacing failures instead of panicking.
pub fn fill_random<R: CryptoRngCore>(rng: &mut R, dest: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(dest)
        .map_err(|e| Error::RandomnessUnavailable(e.to_string()))
}

/// Samples an integer uniformly from the inclusive range `[min, max]`.
///
/// Uses rejection sampling over the smallest bit length covering the range, so
/// the result carries no modulo bias.
///
/// # Errors
///
/// - [`Error::InvalidParameters`] if `min > max`
/// - [`Error::RandomnessUnavailable`] if the source fails, or keeps producing
///   out-of-range values (a stuck source)
pub fn sample_range<R: CryptoRngCore>(
    rng: &mut R,
    min: &BigUint,
    max: &BigUint,
) -> Result<BigUint> {
    if min > max {
        return Err(Error::InvalidParameters(format!(
            "empty sampling range [{min}, {max}]"
        )));
    }

    let span = max - min;
    if span.bits() == 0 {
        return Ok(min.clone());
    }

    let bits = span.bits();
    let byte_len = usize::try_from(bits.div_ceil(8))
        .map_err(|_| Error::InvalidParameters("sampling range too large".to_string()))?;
    let excess_bits = (byte_len as u64 * 8 - bits) as u32;
    let top_mask = 0xFFu8 >> excess_bits;

    let mut buf = vec![0u8; byte_len];
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        fill_random(rng, &mut buf)?;
        buf[0] &= top_mask;

        let candidate = BigUint::from_bytes_be(&buf);
        if candidate <= span {
            buf.zeroize();
            return Ok(min + candidate);
        }
    }
    buf.zeroize();

    Err(Error::RandomnessUnavailable(format!(
        "no value in range after {MAX_SAMPLING_ATTEMPTS} attempts"
    )))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    /// A source that always fails.
    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {}

        fn try_fill_bytes(
            &mut self,
            _dest: &mut [u8],
        ) -> core::result::Result<(), rand_core::Error> {
            Err(rand_core::Error::new("entropy source offline"))
        }
    }

    impl CryptoRng for FailingRng {}

    /// A source stuck at all-ones bytes.
    struct StuckRng;

    impl RngCore for StuckRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xFF);
        }

        fn try_fill_bytes(
            &mut self,
            dest: &mut [u8],
        ) -> core::result::Result<(), rand_core::Error> {
            dest.fill(0xFF);
            Ok(())
        }
    }

    impl CryptoRng for StuckRng {}

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let min = BigUint::from(1u32);
        let max = BigUint::from(21u32);

        for _ in 0..500 {
            let v = sample_range(&mut rng, &min, &max).unwrap();
            assert!(v >= min && v <= max);
        }
    }

    #[test]
    fn samples_cover_small_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let min = BigUint::from(0u32);
        let max = BigUint::from(3u32);
        let mut seen = [false; 4];

        for _ in 0..200 {
            let v = sample_range(&mut rng, &min, &max).unwrap();
            let idx = v.to_u32_digits().first().copied().unwrap_or(0) as usize;
            seen[idx] = true;
        }

        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn degenerate_range_returns_min() {
        let mut rng = FailingRng;
        let v = BigUint::from(9u32);
        assert_eq!(sample_range(&mut rng, &v, &v).unwrap(), v);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = sample_range(&mut rng, &BigUint::from(5u32), &BigUint::from(4u32));
        assert!(matches!(result, Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn failing_source_is_reported() {
        let mut rng = FailingRng;
        let result = sample_range(&mut rng, &BigUint::from(1u32), &BigUint::from(100u32));
        assert!(matches!(result, Err(Error::RandomnessUnavailable(_))));
    }

    #[test]
    fn stuck_source_is_reported() {
        let mut rng = StuckRng;
        // 0xFF masked to 5 bits is 31, always above the span of 20.
        let result = sample_range(&mut rng, &BigUint::from(1u32), &BigUint::from(21u32));
        assert!(matches!(result, Err(Error::RandomnessUnavailable(_))));
    }
}
