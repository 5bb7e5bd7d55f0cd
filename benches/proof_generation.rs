use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use schnorr_zkp::{GroupParameters, KeyPair, Prover, SecureRng, Verifier};

fn bench_commitment(c: &mut Criterion) {
    let params = GroupParameters::rfc5114_2048_256();
    let mut rng = SecureRng::new();
    let keys = KeyPair::random(&params, &mut rng).unwrap();

    c.bench_function("rfc5114_commitment", |b| {
        b.iter(|| {
            let mut prover = Prover::new(params.clone(), keys.clone());
            prover.commit(black_box(&mut rng)).unwrap()
        })
    });
}

fn bench_interactive_round(c: &mut Criterion) {
    let params = GroupParameters::rfc5114_2048_256();
    let mut rng = SecureRng::new();
    let keys = KeyPair::random(&params, &mut rng).unwrap();

    c.bench_function("rfc5114_interactive_round", |b| {
        b.iter(|| {
            let mut prover = Prover::new(params.clone(), keys.clone());
            let mut verifier = Verifier::new(params.clone(), keys.public_key().clone()).unwrap();

            let commitment = prover.commit(&mut rng).unwrap();
            let challenge = verifier.challenge(&mut rng, &commitment).unwrap();
            let response = prover.respond(&challenge).unwrap();
            verifier
                .verify(black_box(&commitment), black_box(&response))
                .unwrap()
        })
    });
}

fn bench_key_generation(c: &mut Criterion) {
    let params = GroupParameters::rfc5114_2048_256();
    let mut rng = SecureRng::new();

    c.bench_function("rfc5114_key_generation", |b| {
        b.iter(|| KeyPair::random(black_box(&params), &mut rng).unwrap())
    });
}

criterion_group!(
    benches,
    bench_commitment,
    bench_interactive_round,
    bench_key_generation
);
criterion_main!(benches);
