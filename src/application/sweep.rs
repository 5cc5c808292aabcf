//! Optional scheduled-publish sweep.
//!
//! Visibility never depends on this: the live view computes scheduled
//! visibility at read time. When enabled, the sweep additionally persists
//! the transition so the stored status reflects what readers already see.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, error, info};

use crate::application::store::{PostingsStore, StoreError};
use crate::domain::entities::PostingPatch;
use crate::domain::types::PostingStatus;

/// Rewrite every scheduled posting whose publish instant has passed to
/// published. Returns the number of postings rewritten.
pub async fn persist_due_postings(
    store: &Arc<dyn PostingsStore>,
    now: OffsetDateTime,
) -> Result<usize, StoreError> {
    let snapshot = store.subscribe().borrow().clone();
    let due: Vec<_> = snapshot
        .iter()
        .filter(|record| {
            record.status == PostingStatus::Scheduled
                && record.publish_at.is_some_and(|at| at <= now)
        })
        .map(|record| record.id)
        .collect();

    for id in &due {
        // Only the status flips; the schedule instant stays on the record.
        let patch = PostingPatch {
            status: Some(PostingStatus::Published),
            ..PostingPatch::default()
        };
        store.update(*id, patch).await?;
        debug!(target = "rozgar::sweep", posting_id = %id, "persisted scheduled publication");
    }

    Ok(due.len())
}

/// Spawn the interval task driving [`persist_due_postings`].
pub fn spawn_sweep(
    store: Arc<dyn PostingsStore>,
    cadence: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cadence);
        interval.tick().await; // Skip the first immediate tick
        loop {
            interval.tick().await;
            match persist_due_postings(&store, OffsetDateTime::now_utc()).await {
                Ok(0) => {}
                Ok(count) => {
                    info!(target = "rozgar::sweep", count, "published due postings");
                }
                Err(err) => {
                    error!(target = "rozgar::sweep", error = %err, "sweep pass failed");
                }
            }
        }
    })
}
