use std::sync::Arc;
use std::time::SystemTime;

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::catalog::config::{Config, RefreshGating};
use crate::catalog::errors::{CatalogError, RefreshError};
use crate::catalog::fetcher::{Fetcher, TimedFetcher};
use crate::catalog::product::Product;
use crate::catalog::refresh_gate::{GateOutcome, RefreshGate, RefreshResult};
use crate::catalog::stats::{ConcurrentStatsCounter, StatsSummary};
use crate::catalog::store::live_query::LiveQuery;
use crate::catalog::store::snapshot::SnapshotVersion;
use crate::catalog::store::Store;

struct CacheState {
    last_refresh_at: Option<SystemTime>,
    last_failure_at: Option<SystemTime>,
}

impl CacheState {
    fn advance_to(&mut self, time: SystemTime) {
        match self.last_refresh_at {
            Some(last_refresh_at) if last_refresh_at >= time => {}
            _ => self.last_refresh_at = Some(time),
        }
        self.last_failure_at = None;
    }
}

/// CacheCoordinator serves the catalog from a [`Store`] and refreshes the store from a [`Fetcher`] once the cached
/// catalog is older than the configured time to live.
///
/// A refresh cycle fetches the complete catalog (bounded by the fetch timeout), installs it with a single
/// `Store::replace_all`, and only then moves the time of the last refresh forward. A failed fetch or a failed replace
/// leaves both the store and the time of the last refresh untouched: the stale catalog keeps serving reads and the
/// next freshness check retries. Failures are logged, counted in the stats and passed to the refresh error hook.
///
/// At most one refresh cycle runs at a time, concurrent callers that find the catalog stale wait for the cycle in
/// flight and share its outcome. A fetch that outlives its timeout is not repeated: the next cycle waits on it.
///
/// With [`RefreshGating::CatalogReads`], only [`CacheCoordinator::products`] checks freshness; every other read serves
/// whatever is currently cached.
pub struct CacheCoordinator {
    config: Config,
    store: Arc<Store>,
    fetcher: TimedFetcher,
    state: RwLock<CacheState>,
    refresh_gate: RefreshGate,
    stats_counter: ConcurrentStatsCounter,
}

impl CacheCoordinator {
    pub fn new(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_store(config, Store::new(), fetcher)
    }

    /// Creates a coordinator over an existing store. The coordinator always starts as never refreshed,
    /// so the first freshness check refreshes the store.
    pub fn with_store(config: Config, store: Arc<Store>, fetcher: Arc<dyn Fetcher>) -> Self {
        info!(
            "Initialized CacheCoordinator with time to live {:?}, fetch timeout {:?} and gating {:?}",
            config.time_to_live, config.fetch_timeout, config.gating
        );
        CacheCoordinator {
            config,
            store,
            fetcher: TimedFetcher::new(fetcher),
            state: RwLock::new(CacheState { last_refresh_at: None, last_failure_at: None }),
            refresh_gate: RefreshGate::new(),
            stats_counter: ConcurrentStatsCounter::new(),
        }
    }

    /// Refreshes the catalog if it is stale, that is if it was never refreshed or if its age exceeds the time to live.
    /// Returns the outcome of the refresh cycle that this call ran or waited for; a fresh catalog returns `Ok(())`.
    pub fn ensure_fresh(&self) -> RefreshResult {
        if !self.is_stale() {
            self.stats_counter.found_fresh();
            return Ok(());
        }
        self.stats_counter.found_stale();
        if self.is_backing_off() {
            self.stats_counter.suppress_refresh();
            debug!("Serving the stale catalog, a recent refresh failed");
            return Ok(());
        }
        self.refresh_stale()
    }

    /// Refreshes the catalog regardless of its age. A refresh already in flight is shared instead of repeated.
    pub fn force_refresh(&self) -> RefreshResult {
        self.refresh_through_gate(|| true)
    }

    pub fn is_stale(&self) -> bool {
        match self.last_refresh_at() {
            None => true,
            Some(last_refresh_at) => self.config.clock.elapsed_since(&last_refresh_at) > self.config.time_to_live,
        }
    }

    pub fn last_refresh_at(&self) -> Option<SystemTime> {
        self.state.read().last_refresh_at
    }

    pub fn snapshot_version(&self) -> SnapshotVersion {
        self.store.version()
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn stats_summary(&self) -> StatsSummary {
        self.stats_counter.summary()
    }

    /// All products, or the products of `category`. Checks freshness first.
    pub fn products(&self, category: Option<&str>) -> LiveQuery<Vec<Product>> {
        self.ensure_fresh_for_read();
        match category {
            None => self.store.watch(|snapshot| snapshot.all()),
            Some(category) => {
                let category = category.to_string();
                self.store.watch(move |snapshot| snapshot.by_category(&category))
            }
        }
    }

    pub fn product_by_id(&self, id: &str) -> Result<Product, CatalogError> {
        self.gate_read();
        self.store
            .snapshot()
            .by_id(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    pub fn watch_product_by_id(&self, id: &str) -> LiveQuery<Option<Product>> {
        self.gate_read();
        let id = id.to_string();
        self.store.watch(move |snapshot| snapshot.by_id(&id).cloned())
    }

    pub fn search_products(&self, query: &str) -> LiveQuery<Vec<Product>> {
        self.gate_read();
        let query = query.to_string();
        self.store.watch(move |snapshot| snapshot.search(&query))
    }

    pub fn products_by_brand(&self, brand: &str) -> LiveQuery<Vec<Product>> {
        self.gate_read();
        let brand = brand.to_string();
        self.store.watch(move |snapshot| snapshot.by_brand(&brand))
    }

    pub fn products_by_price_range(&self, min_price: f64, max_price: f64) -> LiveQuery<Vec<Product>> {
        self.gate_read();
        self.store.watch(move |snapshot| snapshot.by_price_range(min_price, max_price))
    }

    pub fn products_by_rating(&self, minimum_rating: f32) -> LiveQuery<Vec<Product>> {
        self.gate_read();
        self.store.watch(move |snapshot| snapshot.by_minimum_rating(minimum_rating))
    }

    pub fn filtered_products(&self, category: &str, min_price: f64, max_price: f64) -> LiveQuery<Vec<Product>> {
        self.gate_read();
        let category = category.to_string();
        self.store.watch(move |snapshot| snapshot.filtered(&category, min_price, max_price))
    }

    pub fn categories(&self) -> LiveQuery<Vec<String>> {
        self.gate_read();
        self.store.watch(|snapshot| snapshot.categories())
    }

    pub fn brands(&self) -> LiveQuery<Vec<String>> {
        self.gate_read();
        self.store.watch(|snapshot| snapshot.brands())
    }

    pub fn discounted_products(&self) -> LiveQuery<Vec<Product>> {
        self.gate_read();
        self.store.watch(|snapshot| snapshot.discounted())
    }

    /// Products created within the new arrivals window, newest first.
    /// The cutoff is computed once, when the live query is created.
    pub fn new_arrivals(&self) -> LiveQuery<Vec<Product>> {
        self.gate_read();
        let cutoff = self.config.clock.now()
            .checked_sub(self.config.new_arrivals_window)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        self.store.watch(move |snapshot| snapshot.created_after(cutoff))
    }

    pub fn trending_products(&self) -> LiveQuery<Vec<Product>> {
        self.products_by_rating(self.config.trending_rating)
    }

    /// Products of `category` other than `exclude_id`, capped at the configured related limit.
    pub fn related_products(&self, category: &str, exclude_id: &str) -> LiveQuery<Vec<Product>> {
        self.related_products_with_limit(category, exclude_id, self.config.related_limit)
    }

    pub fn related_products_with_limit(&self, category: &str, exclude_id: &str, limit: usize) -> LiveQuery<Vec<Product>> {
        self.gate_read();
        let category = category.to_string();
        let exclude_id = exclude_id.to_string();
        self.store.watch(move |snapshot| snapshot.related(&category, &exclude_id, limit))
    }

    pub fn product_count_in_category(&self, category: &str) -> usize {
        self.gate_read();
        self.store.snapshot().count_in_category(category)
    }

    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        self.gate_read();
        self.store.snapshot().price_bounds()
    }

    fn is_backing_off(&self) -> bool {
        let backoff = self.config.failure_backoff;
        match self.state.read().last_failure_at {
            Some(last_failure_at) if !backoff.is_zero() => self.config.clock.elapsed_since(&last_failure_at) < backoff,
            _ => false,
        }
    }

    fn refresh_stale(&self) -> RefreshResult {
        self.refresh_through_gate(|| self.is_stale() && !self.is_backing_off())
    }

    fn gate_read(&self) {
        if self.config.gating == RefreshGating::AllReads {
            self.ensure_fresh_for_read();
        }
    }

    // reads never fail because of a refresh, the failure is already reported by the cycle that ran it
    fn ensure_fresh_for_read(&self) {
        if let Err(error) = self.ensure_fresh() {
            debug!("Serving the cached catalog after a failed refresh: {}", error);
        }
    }

    fn refresh_through_gate<Needed>(&self, still_needed: Needed) -> RefreshResult
        where Needed: FnOnce() -> bool {
        match self.refresh_gate.run(still_needed, || self.refresh()) {
            GateOutcome::Performed(outcome) => {
                // the hook runs outside the gate, it may call back into the coordinator
                if let (Err(error), Some(hook)) = (&outcome, &self.config.refresh_error_hook) {
                    hook(error);
                }
                outcome
            }
            GateOutcome::Shared(outcome) => {
                self.stats_counter.share_refresh();
                debug!("Shared the outcome of a refresh completed by another caller");
                outcome
            }
            GateOutcome::Skipped => Ok(()),
        }
    }

    fn refresh(&self) -> RefreshResult {
        self.stats_counter.start_refresh();
        let outcome = self.fetch_and_replace();
        if let Err(error) = &outcome {
            self.state.write().last_failure_at = Some(self.config.clock.now());
            self.report(error);
        }
        outcome
    }

    fn fetch_and_replace(&self) -> RefreshResult {
        let records = self.fetcher.fetch(self.config.fetch_timeout)
            .map_err(RefreshError::FetchFailed)?;

        let total_records = records.len();
        let version = self.store.replace_all(records).map_err(RefreshError::StoreWriteFailed)?;

        let refreshed_at = self.config.clock.now();
        self.state.write().advance_to(refreshed_at);
        self.stats_counter.succeed_refresh(total_records as u64);

        info!("Refreshed the catalog with {} records, snapshot version {}", total_records, version);
        Ok(())
    }

    fn report(&self, error: &RefreshError) {
        match error {
            RefreshError::FetchFailed(_) => self.stats_counter.fail_fetch(),
            RefreshError::StoreWriteFailed(_) => self.stats_counter.fail_store_write(),
        }
        warn!("Keeping the cached catalog, {}", error);
    }
}
