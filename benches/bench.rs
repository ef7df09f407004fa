//! Criterion benchmarks for Pike storages.
//!
//! Covers view creation and materialization between memory and mapped files.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use pike::prelude::*;
use std::hint::black_box;
use tempfile::TempDir;

const PAYLOAD_SIZE: usize = 4 * 1024 * 1024;

/// Generate a deterministic payload for benchmarking.
fn generate_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn bench_create_view(c: &mut Criterion) {
    let storage: StoragePointer = MemoryStorage::from(generate_payload(PAYLOAD_SIZE)).into_shared();

    c.bench_function("create_view", |b| {
        b.iter(|| {
            let view = storage.create_view(black_box(4096), black_box(1024)).unwrap();
            black_box(view.data()[0]);
        })
    });
}

fn bench_materialize(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let payload = generate_payload(PAYLOAD_SIZE);
    let memory = MemoryStorage::from_slice(&payload).into_shared();
    let file = FileStorage::create(temp_dir.path().join("source.bin"), payload.len(), Some(&payload[..]))
        .unwrap();

    let mut group = c.benchmark_group("materialize");
    group.throughput(Throughput::Bytes(PAYLOAD_SIZE as u64));

    group.bench_function("file_to_memory", |b| {
        b.iter(|| black_box(file.to_memory_storage().size()))
    });

    let target = temp_dir.path().join("target.bin");
    group.bench_function("memory_to_file", |b| {
        b.iter(|| black_box(memory.to_file_storage(&target).unwrap().size()))
    });

    group.finish();
}

criterion_group!(benches, bench_create_view, bench_materialize);
criterion_main!(benches);
