use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;

use catalog_cached::catalog::clock::Clock;
use catalog_cached::catalog::fetcher::{FetchResult, Fetcher};

#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        ManualClock { now: Arc::new(Mutex::new(SystemTime::now())) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock()
    }
}

/// Replays the given responses in order, sleeping `latency` before each one, and counts its calls.
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<FetchResult>>,
    latency: Duration,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedFetcher {
    pub fn new(responses: Vec<FetchResult>) -> Arc<Self> {
        Self::with_latency(responses, Duration::ZERO)
    }

    pub fn with_latency(responses: Vec<FetchResult>, latency: Duration) -> Arc<Self> {
        Arc::new(ScriptedFetcher {
            responses: Mutex::new(responses.into_iter().collect()),
            latency,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch_all(&self) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        self.responses.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}
