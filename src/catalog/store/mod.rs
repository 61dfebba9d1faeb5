use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use hashbrown::HashMap;
use log::debug;
use parking_lot::{Mutex, RwLock};

use crate::catalog::product::Product;
use crate::catalog::store::error::StoreError;
use crate::catalog::store::live_query::LiveQuery;
use crate::catalog::store::snapshot::{Snapshot, SnapshotVersion};

pub mod error;
pub mod live_query;
pub mod snapshot;

pub(crate) type SubscriberId = u64;

/// Store holds the current [`Snapshot`] of the catalog.
///
/// Readers clone the `Arc` of the current snapshot under a short read lock and then work on it without any lock.
/// `replace_all` builds the new snapshot off to the side and installs it with a single pointer swap, so a reader
/// observes either the previous snapshot or the new one, never a partially written or transiently empty one.
///
/// Every live query registers a wake-up channel with the store and unregisters it when dropped. After a snapshot is
/// installed, each registered channel is signalled; the channel is bounded with a capacity of one so that a slow
/// subscriber coalesces wake-ups and always reads the latest snapshot.
pub struct Store {
    current: RwLock<Arc<Snapshot>>,
    subscribers: Mutex<HashMap<SubscriberId, Sender<()>>>,
    next_subscriber_id: AtomicU64,
}

impl Store {
    pub fn new() -> Arc<Store> {
        Arc::new(Store {
            current: RwLock::new(Arc::new(Snapshot::empty())),
            subscribers: Mutex::new(HashMap::new()),
            next_subscriber_id: AtomicU64::new(0),
        })
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    pub fn version(&self) -> SnapshotVersion {
        self.current.read().version()
    }

    /// Validates all the `records` and installs them as the new snapshot.
    /// If any record is invalid, nothing is installed and the current snapshot stays as it is.
    /// An empty `records` installs an empty snapshot.
    pub fn replace_all(&self, records: Vec<Product>) -> Result<SnapshotVersion, StoreError> {
        for product in &records {
            product.validate().map_err(|reason| StoreError::InvalidRecord {
                id: product.id().to_string(),
                reason,
            })?;
        }

        // writers are serialized by the subscribers lock, which keeps versions and notifications in order
        let mut subscribers = self.subscribers.lock();
        let version = self.version() + 1;
        let snapshot = Arc::new(Snapshot::new(version, records));
        *self.current.write() = snapshot;

        subscribers.retain(|_, subscriber| match subscriber.try_send(()) {
            Ok(_) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });
        debug!("Installed snapshot version {}, notified {} live queries", version, subscribers.len());
        Ok(version)
    }

    /// Returns a [`LiveQuery`] that applies `projection` to the current snapshot, and again after every replace.
    pub fn watch<T, F>(self: &Arc<Self>, projection: F) -> LiveQuery<T>
        where F: Fn(&Snapshot) -> T + Send + Sync + 'static {
        let (subscriber_id, changes) = self.subscribe();
        LiveQuery::new(self.clone(), subscriber_id, changes, Box::new(projection))
    }

    fn subscribe(&self) -> (SubscriberId, Receiver<()>) {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let subscriber_id = self.next_subscriber_id.fetch_add(1, Ordering::AcqRel);
        self.subscribers.lock().insert(subscriber_id, sender);
        (subscriber_id, receiver)
    }

    pub(crate) fn unsubscribe(&self, subscriber_id: SubscriberId) {
        self.subscribers.lock().remove(&subscriber_id);
    }

    #[cfg(test)]
    pub(crate) fn total_subscribers(&self) -> usize {
        self.subscribers.lock().len()
    }
}
