//! Common test utilities shared across integration tests.
#![allow(dead_code)]

use num_bigint::BigUint;
use schnorr_zkp::GroupParameters;

/// Initialize test tracing (call once at the beginning of tests).
///
/// This sets up tracing for tests with DEBUG level output from the library
/// to the test writer. Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("schnorr_zkp=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// The textbook group `p = 23, g = 5` (`g` is a primitive root, `n = 22`).
pub fn toy_params() -> GroupParameters {
    GroupParameters::new(BigUint::from(23u32), BigUint::from(5u32))
        .expect("toy parameters should be valid")
}

/// The order-11 subgroup of `Z_23^*` generated by 2.
pub fn toy_subgroup_params() -> GroupParameters {
    GroupParameters::with_order(
        BigUint::from(23u32),
        BigUint::from(11u32),
        BigUint::from(2u32),
    )
    .expect("subgroup parameters should be valid")
}
