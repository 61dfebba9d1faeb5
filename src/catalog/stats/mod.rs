use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

const TOTAL_STATS: usize = 9;

/// Defines various stats that are measured by the [`crate::catalog::coordinator::CacheCoordinator`].
#[repr(usize)]
#[non_exhaustive]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StatsType {
    /// Defines the number of freshness checks that found the cached catalog fresh
    FreshnessHits = 0,
    /// Defines the number of freshness checks that found the cached catalog stale
    StaleChecks = 1,
    /// Defines the number of refresh cycles started
    RefreshesStarted = 2,
    /// Defines the number of refresh cycles that installed a new snapshot
    RefreshesSucceeded = 3,
    /// Defines the number of callers that waited for, and shared the outcome of, a refresh cycle run by another caller
    RefreshesShared = 4,
    /// Defines the number of refresh cycles aborted because the fetch failed
    FetchFailures = 5,
    /// Defines the number of refresh cycles aborted because the store could not install the fetched records
    StoreWriteFailures = 6,
    /// Defines the total number of records installed by refresh cycles
    RecordsInstalled = 7,
    /// Defines the number of stale freshness checks that skipped a refresh because of the failure backoff
    RefreshesSuppressed = 8,
}

impl StatsType {
    const VALUES: [Self; TOTAL_STATS] = [
        Self::FreshnessHits,
        Self::StaleChecks,
        Self::RefreshesStarted,
        Self::RefreshesSucceeded,
        Self::RefreshesShared,
        Self::FetchFailures,
        Self::StoreWriteFailures,
        Self::RecordsInstalled,
        Self::RefreshesSuppressed,
    ];
}

/// StatsSummary is view representation of various stats represented by [`StatsType`].
#[derive(Debug, PartialEq)]
pub struct StatsSummary {
    pub stats_by_type: HashMap<StatsType, u64>,
    pub hit_ratio: f64,
}

impl StatsSummary {
    pub(crate) fn new(stats_by_type: HashMap<StatsType, u64>, hit_ratio: f64) -> Self {
        StatsSummary {
            stats_by_type,
            hit_ratio,
        }
    }

    /// Returns an Option&lt;u64&gt; counter corresponding to the [`StatsType`].
    pub fn get(&self, stats_type: &StatsType) -> Option<u64> {
        self.stats_by_type.get(stats_type).copied()
    }
}

#[repr(transparent)]
#[derive(Debug)]
struct Counter(CachePadded<AtomicU64>);

/// ConcurrentStatsCounter measures various stats defined by [`StatsType`].
/// Each entry is a [`crossbeam_utils::CachePadded`] AtomicU64, to avoid false sharing between the counters.
pub(crate) struct ConcurrentStatsCounter {
    entries: [Counter; TOTAL_STATS],
}

impl ConcurrentStatsCounter {
    pub(crate) fn new() -> Self {
        ConcurrentStatsCounter {
            entries: std::array::from_fn(|_index| Counter(CachePadded::new(AtomicU64::new(0))))
        }
    }

    pub(crate) fn found_fresh(&self) { self.add(StatsType::FreshnessHits, 1); }

    pub(crate) fn found_stale(&self) { self.add(StatsType::StaleChecks, 1); }

    pub(crate) fn start_refresh(&self) { self.add(StatsType::RefreshesStarted, 1); }

    pub(crate) fn succeed_refresh(&self, records: u64) {
        self.add(StatsType::RefreshesSucceeded, 1);
        self.add(StatsType::RecordsInstalled, records);
    }

    pub(crate) fn share_refresh(&self) { self.add(StatsType::RefreshesShared, 1); }

    pub(crate) fn fail_fetch(&self) { self.add(StatsType::FetchFailures, 1); }

    pub(crate) fn fail_store_write(&self) { self.add(StatsType::StoreWriteFailures, 1); }

    pub(crate) fn suppress_refresh(&self) { self.add(StatsType::RefreshesSuppressed, 1); }

    pub(crate) fn freshness_hits(&self) -> u64 { self.get(&StatsType::FreshnessHits) }

    pub(crate) fn stale_checks(&self) -> u64 { self.get(&StatsType::StaleChecks) }

    /// Ratio of freshness checks that were served without a refresh.
    pub(crate) fn hit_ratio(&self) -> f64 {
        let hits = self.freshness_hits();
        let stale = self.stale_checks();
        if hits == 0 {
            return 0.0;
        }
        (hits as f64) / (hits + stale) as f64
    }

    pub(crate) fn summary(&self) -> StatsSummary {
        let mut stats_by_type = HashMap::new();
        for stats_type in StatsType::VALUES.iter().copied() {
            stats_by_type.insert(stats_type, self.get(&stats_type));
        }
        StatsSummary::new(stats_by_type, self.hit_ratio())
    }

    fn add(&self, stats_type: StatsType, count: u64) {
        self.entries[stats_type as usize].0.fetch_add(count, Ordering::AcqRel);
    }

    fn get(&self, stats_type: &StatsType) -> u64 {
        self.entries[*stats_type as usize].0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
impl ConcurrentStatsCounter {
    pub(crate) fn refreshes_started(&self) -> u64 { self.get(&StatsType::RefreshesStarted) }

    pub(crate) fn refreshes_succeeded(&self) -> u64 { self.get(&StatsType::RefreshesSucceeded) }

    pub(crate) fn refreshes_shared(&self) -> u64 { self.get(&StatsType::RefreshesShared) }

    pub(crate) fn fetch_failures(&self) -> u64 { self.get(&StatsType::FetchFailures) }

    pub(crate) fn store_write_failures(&self) -> u64 { self.get(&StatsType::StoreWriteFailures) }

    pub(crate) fn records_installed(&self) -> u64 { self.get(&StatsType::RecordsInstalled) }

    pub(crate) fn refreshes_suppressed(&self) -> u64 { self.get(&StatsType::RefreshesSuppressed) }
}
