// Signing & private-marker benchmarks for Veil.
//
// Covers key generation, legacy and replay-protected signing, the
// recovery-field rewrite, and sender recovery from a marked encoding at a
// few payload sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use primitive_types::U256;

use veil_protocol::crypto::Credentials;
use veil_protocol::transaction::{mark_private, recover_sender, sign_transaction, RawTransaction};

fn sample_tx(payload_len: usize) -> RawTransaction {
    RawTransaction::builder(U256::from(42u64), U256::zero(), U256::from(4_300_000u64))
        .to_hex("0x2c7536e3605d9c16a7a3d7b1898e529396a65c23")
        .expect("valid address")
        .data_bytes(&vec![0x60; payload_len])
        .build()
        .expect("valid transaction")
}

fn bench_credentials_generation(c: &mut Criterion) {
    c.bench_function("secp256k1/credentials_generate", |b| {
        b.iter(Credentials::generate);
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let creds = Credentials::generate();
    let tx = sample_tx(64);

    c.bench_function("secp256k1/sign_legacy", |b| {
        b.iter(|| sign_transaction(&tx, &creds, None));
    });
    c.bench_function("secp256k1/sign_replay_protected", |b| {
        b.iter(|| sign_transaction(&tx, &creds, Some(1337)));
    });
}

fn bench_mark_private(c: &mut Criterion) {
    let creds = Credentials::generate();
    let mut group = c.benchmark_group("privacy/mark_private");

    for size in [32usize, 1_024, 32 * 1_024] {
        let signed = sign_transaction(&sample_tx(size), &creds, None);
        group.throughput(Throughput::Bytes(signed.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &signed, |b, signed| {
            b.iter(|| mark_private(signed));
        });
    }

    group.finish();
}

fn bench_recover_marked_sender(c: &mut Criterion) {
    let creds = Credentials::generate();
    let marked = mark_private(&sign_transaction(&sample_tx(64), &creds, None));

    c.bench_function("privacy/recover_marked_sender", |b| {
        b.iter(|| recover_sender(&marked));
    });
}

criterion_group!(
    benches,
    bench_credentials_generation,
    bench_sign_transaction,
    bench_mark_private,
    bench_recover_marked_sender,
);
criterion_main!(benches);
