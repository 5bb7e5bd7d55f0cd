use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use schnorr_zkp::{GroupParameters, KeyPair, SecureRng, Signature, SignatureVerifier, Signer};

fn bench_signing(c: &mut Criterion) {
    let params = GroupParameters::rfc5114_2048_256();
    let mut rng = SecureRng::new();
    let keys = KeyPair::random(&params, &mut rng).unwrap();
    let signer = Signer::new(params, keys);

    let mut group = c.benchmark_group("signing");
    for size in [32usize, 1024, 16 * 1024] {
        let message = vec![0xA5u8; size];
        group.bench_with_input(BenchmarkId::new("hedged", size), &message, |b, message| {
            b.iter(|| signer.sign(&mut rng, black_box(message)).unwrap())
        });
        group.bench_with_input(
            BenchmarkId::new("deterministic", size),
            &message,
            |b, message| b.iter(|| signer.sign_deterministic(black_box(message)).unwrap()),
        );
    }
    group.finish();
}

fn bench_verification(c: &mut Criterion) {
    let params = GroupParameters::rfc5114_2048_256();
    let mut rng = SecureRng::new();
    let keys = KeyPair::random(&params, &mut rng).unwrap();
    let verifier = SignatureVerifier::new(params.clone(), keys.public_key().clone()).unwrap();
    let signature = Signer::new(params, keys).sign(&mut rng, b"benchmark").unwrap();

    c.bench_function("signature_verification", |b| {
        b.iter(|| {
            verifier
                .verify(black_box(b"benchmark"), black_box(&signature))
                .unwrap()
        })
    });
}

fn bench_signature_decoding(c: &mut Criterion) {
    let params = GroupParameters::rfc5114_2048_256();
    let mut rng = SecureRng::new();
    let keys = KeyPair::random(&params, &mut rng).unwrap();
    let bytes = Signer::new(params, keys)
        .sign(&mut rng, b"benchmark")
        .unwrap()
        .to_bytes();

    c.bench_function("signature_decoding", |b| {
        b.iter(|| Signature::from_bytes(black_box(&bytes)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_signing,
    bench_verification,
    bench_signature_decoding
);
criterion_main!(benches);
