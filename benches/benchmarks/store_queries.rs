use std::sync::Arc;
use std::time::Instant;

use criterion::{Criterion, criterion_group, criterion_main};

use catalog_cached::catalog::store::Store;

use crate::benchmarks::common::{catalog, distribution, execute_parallel, product_id};

/// Defines the total number of products installed in the store
const TOTAL_PRODUCTS: usize = 2 << 14;

/// Defines the total number of lookups generated from the Zipf distribution
const LOOKUPS: usize = 2 << 16;

const MASK: usize = LOOKUPS - 1;

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
pub fn by_id_single_threaded(criterion: &mut Criterion) {
    let store = loaded_store();
    let ids = lookup_ids();

    let mut index = 0;
    criterion.bench_function("Snapshot.by_id() | No contention", |bencher| {
        bencher.iter_custom(|iterations| {
            let start = Instant::now();
            for _ in 0..iterations {
                let _ = store.snapshot().by_id(&ids[index & MASK]).is_some();
                index += 1;
            }
            start.elapsed()
        });
    });
}

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
pub fn by_id_8_threads(criterion: &mut Criterion) {
    let store = loaded_store();
    let ids = Arc::new(lookup_ids());

    execute_parallel(criterion, "Snapshot.by_id() | 8 threads", Arc::new(move |index| {
        let _ = store.snapshot().by_id(&ids[index as usize & MASK]).is_some();
    }), 8);
}

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
pub fn by_category_single_threaded(criterion: &mut Criterion) {
    let store = loaded_store();

    criterion.bench_function("Snapshot.by_category() | No contention", |bencher| {
        bencher.iter(|| store.snapshot().by_category("hats"));
    });
}

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
pub fn search_single_threaded(criterion: &mut Criterion) {
    let store = loaded_store();

    criterion.bench_function("Snapshot.search() | No contention", |bencher| {
        bencher.iter(|| store.snapshot().search("Jackets NUMBER 1"));
    });
}

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
pub fn replace_all_single_threaded(criterion: &mut Criterion) {
    let store = Store::new();
    let products = catalog(TOTAL_PRODUCTS);

    criterion.bench_function("Store.replace_all() | No contention", |bencher| {
        bencher.iter(|| store.replace_all(products.clone()).unwrap());
    });
}

fn loaded_store() -> Arc<Store> {
    let store = Store::new();
    store.replace_all(catalog(TOTAL_PRODUCTS)).unwrap();
    store
}

fn lookup_ids() -> Vec<String> {
    distribution(TOTAL_PRODUCTS as u64, LOOKUPS).into_iter().map(|index| product_id(index - 1)).collect()
}

criterion_group!(
    benches,
    by_id_single_threaded,
    by_id_8_threads,
    by_category_single_threaded,
    search_single_threaded,
    replace_all_single_threaded
);
criterion_main!(benches);
