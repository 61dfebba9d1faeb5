use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::catalog::store::snapshot::{Snapshot, SnapshotVersion};
use crate::catalog::store::{Store, SubscriberId};

pub type Projection<T> = dyn Fn(&Snapshot) -> T + Send + Sync;

/// LiveQuery is a restartable subscription over the [`Store`].
///
/// The first emission is the projection over the snapshot current at that time; every later emission happens after
/// a `replace_all` completed and is the projection over the snapshot current at that time. Wake-ups are coalesced,
/// so a slow consumer skips intermediate snapshots and sees the latest one.
///
/// `current` evaluates the projection without affecting the emissions.
/// As an [`Iterator`], `next` blocks until there is a snapshot that has not been emitted yet.
/// Dropping a LiveQuery unregisters it from the store.
pub struct LiveQuery<T> {
    store: Arc<Store>,
    subscriber_id: SubscriberId,
    changes: Receiver<()>,
    projection: Box<Projection<T>>,
    emitted_version: Option<SnapshotVersion>,
}

impl<T> LiveQuery<T> {
    pub(crate) fn new(
        store: Arc<Store>,
        subscriber_id: SubscriberId,
        changes: Receiver<()>,
        projection: Box<Projection<T>>) -> Self {
        LiveQuery {
            store,
            subscriber_id,
            changes,
            projection,
            emitted_version: None,
        }
    }

    pub fn current(&self) -> T {
        (self.projection)(&self.store.snapshot())
    }

    pub fn emitted_version(&self) -> Option<SnapshotVersion> {
        self.emitted_version
    }

    /// Returns the projection over a snapshot that has not been emitted yet, without blocking.
    pub fn try_next(&mut self) -> Option<T> {
        while self.changes.try_recv().is_ok() {}

        let snapshot = self.store.snapshot();
        if self.emitted_version == Some(snapshot.version()) {
            return None;
        }
        self.emitted_version = Some(snapshot.version());
        Some((self.projection)(&snapshot))
    }

    /// Blocks for at most `timeout` until there is a snapshot that has not been emitted yet.
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(value) = self.try_next() {
                return Some(value);
            }
            let remaining = deadline.checked_duration_since(Instant::now())?;
            self.changes.recv_timeout(remaining).ok()?;
        }
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscriber_id);
    }
}

impl<T> Iterator for LiveQuery<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.try_next() {
                return Some(value);
            }
            self.changes.recv().ok()?;
        }
    }
}
