use std::time::Duration;

use crate::catalog::clock::{ClockType, SystemClock};
use crate::catalog::errors::{Errors, RefreshError};
use crate::catalog::product::{MAX_RATING, MIN_RATING};

pub type RefreshErrorHook = dyn Fn(&RefreshError) + Send + Sync;

const TIME_TO_LIVE: Duration = Duration::from_secs(15 * 60);
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const NEW_ARRIVALS_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const TRENDING_RATING: f32 = 4.0;
const RELATED_LIMIT: usize = 10;
const FAILURE_BACKOFF: Duration = Duration::ZERO;

/// Decides which reads of [`crate::catalog::coordinator::CacheCoordinator`] run the freshness check.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RefreshGating {
    /// Only the catalog reads (all products, products by category) check freshness.
    /// Every other read serves whatever is currently cached.
    CatalogReads,
    /// Every read checks freshness.
    AllReads,
}

pub struct Config {
    pub time_to_live: Duration,
    pub fetch_timeout: Duration,
    pub failure_backoff: Duration,
    pub new_arrivals_window: Duration,
    pub trending_rating: f32,
    pub related_limit: usize,
    pub gating: RefreshGating,
    pub clock: ClockType,
    pub refresh_error_hook: Option<Box<RefreshErrorHook>>,
}

pub struct ConfigBuilder {
    time_to_live: Duration,
    fetch_timeout: Duration,
    failure_backoff: Duration,
    new_arrivals_window: Duration,
    trending_rating: f32,
    related_limit: usize,
    gating: RefreshGating,
    clock: ClockType,
    refresh_error_hook: Option<Box<RefreshErrorHook>>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        ConfigBuilder {
            time_to_live: TIME_TO_LIVE,
            fetch_timeout: FETCH_TIMEOUT,
            failure_backoff: FAILURE_BACKOFF,
            new_arrivals_window: NEW_ARRIVALS_WINDOW,
            trending_rating: TRENDING_RATING,
            related_limit: RELATED_LIMIT,
            gating: RefreshGating::CatalogReads,
            clock: SystemClock::boxed(),
            refresh_error_hook: None,
        }
    }

    pub fn time_to_live(mut self, time_to_live: Duration) -> ConfigBuilder {
        self.time_to_live = time_to_live;
        self
    }

    pub fn fetch_timeout(mut self, fetch_timeout: Duration) -> ConfigBuilder {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// After a failed refresh, freshness checks skip further refresh attempts for `backoff` and serve the cached
    /// catalog. A zero backoff retries on the very next freshness check.
    pub fn failure_backoff(mut self, backoff: Duration) -> ConfigBuilder {
        self.failure_backoff = backoff;
        self
    }

    pub fn new_arrivals_window(mut self, window: Duration) -> ConfigBuilder {
        self.new_arrivals_window = window;
        self
    }

    pub fn trending_rating(mut self, rating: f32) -> ConfigBuilder {
        self.trending_rating = rating;
        self
    }

    pub fn related_limit(mut self, limit: usize) -> ConfigBuilder {
        self.related_limit = limit;
        self
    }

    pub fn gating(mut self, gating: RefreshGating) -> ConfigBuilder {
        self.gating = gating;
        self
    }

    pub fn clock(mut self, clock: ClockType) -> ConfigBuilder {
        self.clock = clock;
        self
    }

    /// Registers a hook that receives every failed refresh, in addition to the log and the stats.
    /// The hook runs once per failed cycle, on the thread that ran the cycle, after the refresh gate is released.
    pub fn refresh_error_hook(mut self, hook: Box<RefreshErrorHook>) -> ConfigBuilder {
        self.refresh_error_hook = Some(hook);
        self
    }

    pub fn build(self) -> Result<Config, Errors> {
        if self.time_to_live.is_zero() {
            return Err(Errors::TtlGtZero);
        }
        if self.fetch_timeout.is_zero() {
            return Err(Errors::FetchTimeoutGtZero);
        }
        if self.related_limit == 0 {
            return Err(Errors::RelatedLimitGtZero);
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.trending_rating) {
            return Err(Errors::TrendingRatingInRange);
        }
        Ok(Config {
            time_to_live: self.time_to_live,
            fetch_timeout: self.fetch_timeout,
            failure_backoff: self.failure_backoff,
            new_arrivals_window: self.new_arrivals_window,
            trending_rating: self.trending_rating,
            related_limit: self.related_limit,
            gating: self.gating,
            clock: self.clock,
            refresh_error_hook: self.refresh_error_hook,
        })
    }
}
