//! "New posting" side-channel: detects transitions of the newest published
//! id across store pushes, against a durable last-seen marker.
//!
//! Guarantees at most one alert per distinct transition. On a cold start
//! (no persisted marker) the current newest id is recorded silently so a
//! fresh session never notifies retroactively.

use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::PostingRecord;
use crate::domain::types::PostingStatus;

#[derive(Debug, Error)]
pub enum LastSeenError {
    #[error("last-seen state unavailable: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable single-key storage for the last-seen posting id. Injected so
/// the transition logic is testable without a real persistence layer.
pub trait LastSeenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, LastSeenError>;
    fn store(&self, id: &str) -> Result<(), LastSeenError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPostingAlert {
    pub id: Uuid,
    pub title: String,
}

pub struct NewPostingWatch<S> {
    store: S,
    last_seen: Mutex<Option<String>>,
}

impl<S: LastSeenStore> NewPostingWatch<S> {
    /// Reads the persisted marker once at construction; a missing or
    /// unreadable marker degrades to the cold-start state.
    pub fn new(store: S) -> Self {
        let last_seen = match store.load() {
            Ok(value) => value,
            Err(err) => {
                warn!(target = "rozgar::notify", error = %err, "could not read last-seen marker");
                None
            }
        };
        Self {
            store,
            last_seen: Mutex::new(last_seen),
        }
    }

    /// Evaluate one store push. Returns the alert to deliver, if any; the
    /// persisted marker is advanced unconditionally.
    pub fn observe(&self, snapshot: &[PostingRecord]) -> Option<NewPostingAlert> {
        let newest = snapshot
            .iter()
            .find(|record| record.status == PostingStatus::Published)?;
        let newest_id = newest.id.to_string();

        let mut guard = self
            .last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let alert = match guard.as_deref() {
            Some(previous) if previous != newest_id => Some(NewPostingAlert {
                id: newest.id,
                title: newest.title.clone(),
            }),
            Some(_) => None,
            // First observation ever: record silently.
            None => None,
        };

        if guard.as_deref() != Some(newest_id.as_str()) {
            if let Err(err) = self.store.store(&newest_id) {
                warn!(target = "rozgar::notify", error = %err, "could not persist last-seen marker");
            }
            *guard = Some(newest_id);
        }

        alert
    }
}

/// Deliver an alert to the operator-facing channels. Delivery failure is
/// silently dropped; there is no retry and no queue.
pub fn deliver(alert: &NewPostingAlert) {
    metrics::counter!("rozgar_notifications_total").increment(1);
    info!(
        target = "rozgar::notify",
        posting_id = %alert.id,
        title = %alert.title,
        "new posting published",
    );
    debug!(target = "rozgar::notify", "notification delivered");
}
