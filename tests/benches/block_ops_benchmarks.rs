//! # BlockOps Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | `ready` | key lookup, split, pad, seal, encode, hash |
//! | `get` | fetch, ID check, unmask, decode, open, depad |
//! | `put` | first store vs. extra reference |

use block_ops::{BlockOps, BlockOpsConfig};
use blockops_tests::fixtures::{private_folder_with, FileBlock};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_crypto::Cipher;
use shared_types::{BlockPointer, OpContext, UserId};
use tokio::runtime::Runtime;

const SIZES: [usize; 3] = [1024, 64 * 1024, 256 * 1024];

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn bench_ready(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("ready");

    for cipher in [Cipher::XChaCha20Poly1305, Cipher::Aes256Gcm] {
        let (ops, md) = private_folder_with(1, BlockOpsConfig::default().with_cipher(cipher));
        let ctx = OpContext::background();

        for size in SIZES {
            let block = FileBlock::random(size);
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(cipher.to_string(), size),
                &block,
                |b, block| {
                    b.to_async(&rt)
                        .iter(|| async { black_box(ops.ready(&ctx, &md, block).await.unwrap()) })
                },
            );
        }
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("get");
    let (ops, md) = private_folder_with(2, BlockOpsConfig::default());
    let ctx = OpContext::background();

    for size in SIZES {
        let ptr = rt.block_on(async {
            let (id, _, ready) = ops.ready(&ctx, &md, &FileBlock::random(size)).await.unwrap();
            let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
            ops.put(&ctx, &md, &ptr, &ready).await.unwrap();
            ptr
        });

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ptr, |b, ptr| {
            b.to_async(&rt).iter(|| async {
                let block: FileBlock = ops.get(&ctx, &md, ptr).await.unwrap();
                black_box(block)
            })
        });
    }

    for verify in [true, false] {
        let config = BlockOpsConfig::default().with_verify_block_ids(verify);
        let (ops, md) = private_folder_with(3, config);
        let ptr = rt.block_on(async {
            let (id, _, ready) = ops.ready(&ctx, &md, &FileBlock::random(SIZES[1])).await.unwrap();
            let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
            ops.put(&ctx, &md, &ptr, &ready).await.unwrap();
            ptr
        });

        let name = if verify { "verify_ids" } else { "skip_id_check" };
        group.bench_function(name, |b| {
            b.to_async(&rt).iter(|| async {
                let block: FileBlock = ops.get(&ctx, &md, &ptr).await.unwrap();
                black_box(block)
            })
        });
    }

    group.finish();
}

fn bench_put(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("put");
    let (ops, md) = private_folder_with(4, BlockOpsConfig::default());
    let ctx = OpContext::background();

    let (ptr, ready) = rt.block_on(async {
        let (id, _, ready) = ops.ready(&ctx, &md, &FileBlock::random(SIZES[1])).await.unwrap();
        (BlockPointer::new(id, md.latest_key_generation(), UserId::default()), ready)
    });

    // Repeat puts of identical bytes are idempotent, so this measures the
    // full store path every iteration.
    group.bench_function("store", |b| {
        b.to_async(&rt)
            .iter(|| async { ops.put(&ctx, &md, &ptr, &ready).await.unwrap() })
    });

    group.bench_function("add_reference", |b| {
        b.to_async(&rt).iter(|| async {
            let copy = ptr.with_new_ref();
            ops.put(&ctx, &md, &copy, &ready).await.unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_ready, bench_get, bench_put);
criterion_main!(benches);
