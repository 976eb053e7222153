use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use empower_infra::{ChangeSet, InMemoryProductStore, ProductStore, SqliteProductStore};
use empower_products::{Product, ProductRecord};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
}

fn chunk(size: usize) -> ChangeSet {
    (0..size)
        .map(|n| Product::create(ProductRecord::generated(n, 0)))
        .collect()
}

/// One generated chunk saved as a single change set.
fn bench_chunk_save(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("chunk_save");

    for size in [100usize, 1_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("in_memory", size), &size, |b, &size| {
            b.iter_batched(
                || (InMemoryProductStore::new(), chunk(size)),
                |(store, changes)| rt.block_on(async { store.save(black_box(changes)).await.unwrap() }),
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("sqlite_memory", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let store = rt.block_on(SqliteProductStore::in_memory()).unwrap();
                    (store, chunk(size))
                },
                |(store, changes)| rt.block_on(async { store.save(black_box(changes)).await.unwrap() }),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Full reload of a populated store (what every catalog refresh pays).
fn bench_fetch_all(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("fetch_all");

    for rows in [1_000usize, 10_000] {
        let store = rt.block_on(async {
            let store = SqliteProductStore::in_memory().await.unwrap();
            store.save(chunk(rows)).await.unwrap();
            store
        });

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("sqlite_memory", rows), &store, |b, store| {
            b.iter(|| rt.block_on(async { black_box(store.fetch_all().await.unwrap()) }));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_chunk_save, bench_fetch_all);
criterion_main!(benches);
