// Derivation, DID and JWE benchmarks for hd-did.
//
// Covers master key derivation, path derivation at increasing depth,
// signing, the did:key codec, and JWE creation for growing recipient sets.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use hd_did::did::{encode_did_key, extract_did_key, CreateJweOptions, DidIdentity, Recipient};
use hd_did::HdKey;

const PASSWORD: &str = "correct horse battery staple";

fn bench_master_key(c: &mut Criterion) {
    c.bench_function("hdkey/from_password", |b| {
        b.iter(|| HdKey::from_password(PASSWORD));
    });
}

fn bench_derive_depth(c: &mut Criterion) {
    let hd = HdKey::from_password(PASSWORD);
    let mut group = c.benchmark_group("hdkey/derive_key_path");

    for depth in [1usize, 3, 5, 10] {
        let path = std::iter::once("m".to_string())
            .chain((0..depth).map(|i| format!("{i}'")))
            .collect::<Vec<_>>()
            .join("/");
        group.bench_with_input(BenchmarkId::from_parameter(depth), &path, |b, path| {
            b.iter(|| hd.derive_key_path(path).unwrap());
        });
    }
    group.finish();
}

fn bench_sign(c: &mut Criterion) {
    let (signer, _) = HdKey::from_password(PASSWORD)
        .derive_key_path("m/0'")
        .unwrap();
    let message = b"transfer 500 from alice to bob; nonce=42";

    c.bench_function("signer/sign", |b| {
        b.iter(|| signer.sign(message));
    });
}

fn bench_did_codec(c: &mut Criterion) {
    let key = [7u8; 32];
    let did = encode_did_key(&key);

    c.bench_function("did/encode", |b| b.iter(|| encode_did_key(&key)));
    c.bench_function("did/extract", |b| b.iter(|| extract_did_key(&did).unwrap()));
}

fn bench_create_jwe(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let sender = DidIdentity::new(&[1u8; 64]).unwrap();
    let mut group = c.benchmark_group("jwe/create");

    for count in [1usize, 4, 16] {
        let keys: Vec<Vec<u8>> = (0..count)
            .map(|i| {
                DidIdentity::new(&[i as u8 + 2; 64])
                    .unwrap()
                    .public_key()
                    .to_vec()
            })
            .collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &keys, |b, keys| {
            b.iter(|| {
                let recipients = keys.iter().cloned().map(Recipient::PublicKey).collect();
                runtime
                    .block_on(sender.create_jwe("bench payload", recipients, CreateJweOptions::default()))
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_master_key,
    bench_derive_depth,
    bench_sign,
    bench_did_codec,
    bench_create_jwe,
);
criterion_main!(benches);
