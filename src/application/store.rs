//! Document-store boundary: trait surface every store adapter implements.
//!
//! The store is push-based. `subscribe` hands back a `watch::Receiver`
//! carrying the full collection, newest-first by creation order; the store
//! re-sends the whole snapshot after every mutation and an empty vec when
//! the collection is empty. Dropping the receiver is the unsubscribe
//! handle. There are no transactions and no concurrency tokens: last
//! writer wins.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use crate::domain::entities::{NewPosting, PostingPatch, PostingRecord, SiteSettingsRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("store unreachable: {0}")]
    Unreachable(String),
}

impl StoreError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Postings collection: subscribe plus create/update/delete.
#[async_trait]
pub trait PostingsStore: Send + Sync {
    /// Current-and-future snapshots of the full collection, newest-first.
    fn subscribe(&self) -> watch::Receiver<Vec<PostingRecord>>;

    /// Insert a record; the store assigns the id and stamps the posted
    /// date. Returns the stored image.
    async fn create(&self, posting: NewPosting) -> Result<PostingRecord, StoreError>;

    /// Merge a partial update into an existing record. An unknown id is a
    /// silent no-op.
    async fn update(&self, id: Uuid, patch: PostingPatch) -> Result<(), StoreError>;

    /// Remove a record. An unknown id is a silent no-op.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Settings singleton: subscribe plus full-replace write.
///
/// The receiver starts at `None` until the first delivery, which lets
/// consumers gate rendering on "settings have arrived at least once".
#[async_trait]
pub trait SettingsStore: Send + Sync {
    fn subscribe(&self) -> watch::Receiver<Option<SiteSettingsRecord>>;

    /// First-read initialization: atomically write the defaults when no
    /// settings document exists, then deliver the current value.
    async fn ensure_settings(&self) -> Result<SiteSettingsRecord, StoreError>;

    /// Full replace, not a merge.
    async fn write_settings(&self, settings: SiteSettingsRecord) -> Result<(), StoreError>;
}
