use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::debug;
use parking_lot::Mutex;

use crate::catalog::fetcher::error::FetchError;
use crate::catalog::product::Product;

pub mod error;

pub type FetchResult = Result<Vec<Product>, FetchError>;

/// Fetcher is the remote source of the catalog. `fetch_all` returns the complete set of products.
///
/// `fetch_all` is a blocking call. The cache never calls it on the caller's thread; it runs on a dedicated thread
/// and its result is awaited at most for the configured fetch timeout. It is never called concurrently by the same
/// cache.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch_all(&self) -> FetchResult;
}

/// FnFetcher adapts a closure to a [`Fetcher`].
pub struct FnFetcher<F>
    where F: Fn() -> FetchResult + Send + Sync + 'static {
    fetch: F,
}

impl<F> FnFetcher<F>
    where F: Fn() -> FetchResult + Send + Sync + 'static {
    pub fn new(fetch: F) -> Self {
        FnFetcher { fetch }
    }
}

impl<F> Fetcher for FnFetcher<F>
    where F: Fn() -> FetchResult + Send + Sync + 'static {
    fn fetch_all(&self) -> FetchResult {
        (self.fetch)()
    }
}

type FetchOutcome = thread::Result<FetchResult>;

/// TimedFetcher runs [`Fetcher::fetch_all`] on a dedicated thread and waits at most the given timeout for its result.
///
/// A fetch that does not finish in time is reported as [`FetchError::Timeout`] but stays outstanding: the next call
/// waits on that fetch, and takes its result, instead of starting another one. At most one `fetch_all` runs at a time.
pub(crate) struct TimedFetcher {
    fetcher: Arc<dyn Fetcher>,
    outstanding: Mutex<Option<Receiver<FetchOutcome>>>,
}

impl TimedFetcher {
    pub(crate) fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        TimedFetcher {
            fetcher,
            outstanding: Mutex::new(None),
        }
    }

    pub(crate) fn fetch(&self, timeout: Duration) -> FetchResult {
        let mut outstanding = self.outstanding.lock();
        let receiver = match outstanding.take() {
            Some(receiver) => {
                debug!("Waiting on the outstanding fetch instead of starting another one");
                receiver
            }
            None => self.spawn()?,
        };

        match receiver.recv_timeout(timeout) {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(FetchError::Panicked),
            Err(RecvTimeoutError::Timeout) => {
                *outstanding = Some(receiver);
                Err(FetchError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(FetchError::Panicked),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_outstanding(&self) -> bool {
        self.outstanding.lock().is_some()
    }

    fn spawn(&self) -> Result<Receiver<FetchOutcome>, FetchError> {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let fetcher = self.fetcher.clone();
        thread::Builder::new()
            .name("catalog-fetch".to_string())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| fetcher.fetch_all()));
                if sender.send(outcome).is_err() {
                    debug!("Discarding the result of a fetch that nobody waits for");
                }
            })
            .map_err(|error| FetchError::WorkerUnavailable(error.to_string()))?;
        Ok(receiver)
    }
}
