//! Performance benchmarks for keel-crypto.
//!
//! Run with: `cargo bench -p keel-crypto`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use keel_crypto::{envelope, hash, keys, safe_is_equal, signing, PublicKey};

fn bench_secure_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("secure_hash");

    for size in [64, 1024, 16384] {
        let data = vec![0xAA; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| hash::secure_hash(black_box(&data)))
        });
    }

    group.finish();
}

fn bench_sign_verify(c: &mut Criterion) {
    let keypair = keys::generate_keypair();
    let message = b"contract call payload";
    let signature = signing::sign(message, &keypair);

    c.bench_function("sign", |b| b.iter(|| signing::sign(black_box(message), &keypair)));
    c.bench_function("verify", |b| {
        b.iter(|| {
            signing::verify(
                black_box(message),
                black_box(&signature),
                keypair.public_key.as_bytes(),
            )
        })
    });
}

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_for_many");
    let sender = keys::generate_keypair();
    let data = vec![0x55; 4096];

    for count in [1, 8, 32] {
        let recipients: Vec<PublicKey> =
            (0..count).map(|_| keys::generate_keypair().public_key).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                envelope::encrypt_for_many(black_box(&data), sender.private_key(), &recipients)
            })
        });
    }

    group.finish();
}

fn bench_safe_is_equal(c: &mut Criterion) {
    let a = vec![0x11; 4096];
    let b = a.clone();
    c.bench_function("safe_is_equal_4k", |bench| {
        bench.iter(|| safe_is_equal(black_box(&a), black_box(&b)))
    });
}

criterion_group!(
    benches,
    bench_secure_hash,
    bench_sign_verify,
    bench_envelope,
    bench_safe_is_equal
);
criterion_main!(benches);
