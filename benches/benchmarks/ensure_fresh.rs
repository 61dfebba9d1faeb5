use std::sync::Arc;
use std::time::{Duration, Instant};

use criterion::{Criterion, criterion_group, criterion_main};

use catalog_cached::catalog::config::ConfigBuilder;
use catalog_cached::catalog::coordinator::CacheCoordinator;
use catalog_cached::catalog::fetcher::FnFetcher;

use crate::benchmarks::common::{catalog, execute_parallel};

const TOTAL_PRODUCTS: usize = 2 << 12;

/// A fresh catalog makes `ensure_fresh` a read of the last refresh time, this benchmark measures that path.
#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
pub fn ensure_fresh_single_threaded(criterion: &mut Criterion) {
    let coordinator = fresh_coordinator();

    criterion.bench_function("CacheCoordinator.ensure_fresh() | No contention", |bencher| {
        bencher.iter_custom(|iterations| {
            let start = Instant::now();
            for _ in 0..iterations {
                coordinator.ensure_fresh().unwrap();
            }
            start.elapsed()
        });
    });
}

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
pub fn ensure_fresh_16_threads(criterion: &mut Criterion) {
    let coordinator = fresh_coordinator();

    execute_parallel(criterion, "CacheCoordinator.ensure_fresh() | 16 threads", Arc::new(move |_index| {
        coordinator.ensure_fresh().unwrap();
    }), 16);
}

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
pub fn force_refresh_single_threaded(criterion: &mut Criterion) {
    let coordinator = fresh_coordinator();

    criterion.bench_function("CacheCoordinator.force_refresh() | No contention", |bencher| {
        bencher.iter(|| coordinator.force_refresh().unwrap());
    });
}

fn fresh_coordinator() -> Arc<CacheCoordinator> {
    let products = catalog(TOTAL_PRODUCTS);
    let fetcher = Arc::new(FnFetcher::new(move || Ok(products.clone())));
    let config = ConfigBuilder::new().time_to_live(Duration::from_secs(3600)).build().unwrap();

    let coordinator = Arc::new(CacheCoordinator::new(config, fetcher));
    coordinator.ensure_fresh().unwrap();
    coordinator
}

criterion_group!(benches, ensure_fresh_single_threaded, ensure_fresh_16_threads, force_refresh_single_threaded);
criterion_main!(benches);
