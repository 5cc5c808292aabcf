//! In-process store adapter.
//!
//! Backs the full trait surface with a mutex-guarded vec and watch
//! channels. Used by the test suites and useful for local runs without a
//! database.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::application::store::{PostingsStore, SettingsStore, StoreError};
use crate::domain::entities::{NewPosting, PostingPatch, PostingRecord, SiteSettingsRecord};

pub struct MemoryStore {
    postings: Mutex<Vec<PostingRecord>>,
    postings_tx: watch::Sender<Vec<PostingRecord>>,
    settings: Mutex<Option<SiteSettingsRecord>>,
    settings_tx: watch::Sender<Option<SiteSettingsRecord>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (postings_tx, _) = watch::channel(Vec::new());
        let (settings_tx, _) = watch::channel(None);
        Self {
            postings: Mutex::new(Vec::new()),
            postings_tx,
            settings: Mutex::new(None),
            settings_tx,
        }
    }

    fn push_postings(&self, snapshot: Vec<PostingRecord>) {
        super::count_push();
        self.postings_tx.send_replace(snapshot);
    }
}

#[async_trait]
impl PostingsStore for MemoryStore {
    fn subscribe(&self) -> watch::Receiver<Vec<PostingRecord>> {
        self.postings_tx.subscribe()
    }

    async fn create(&self, posting: NewPosting) -> Result<PostingRecord, StoreError> {
        let now = OffsetDateTime::now_utc();
        let record = PostingRecord {
            id: Uuid::new_v4(),
            title: posting.title,
            department: posting.department,
            category: posting.category,
            status: posting.status,
            publish_at: posting.publish_at,
            posted_date: now.date(),
            last_date: posting.last_date,
            link: posting.link,
            notification_link: posting.notification_link,
            official_website: posting.official_website,
            short_info: posting.short_info,
            important_dates: posting.important_dates,
            fee: posting.fee,
            age_limit: posting.age_limit,
            total_posts: posting.total_posts,
            vacancy_details: posting.vacancy_details,
            eligibility: posting.eligibility,
            how_to_apply: posting.how_to_apply,
            selection_process: posting.selection_process,
            created_at: now,
        };

        let snapshot = {
            let mut postings = self.postings.lock().unwrap();
            // Newest first, matching creation order.
            postings.insert(0, record.clone());
            postings.clone()
        };
        self.push_postings(snapshot);
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: PostingPatch) -> Result<(), StoreError> {
        let snapshot = {
            let mut postings = self.postings.lock().unwrap();
            let Some(record) = postings.iter_mut().find(|record| record.id == id) else {
                debug!(target = "rozgar::store", posting_id = %id, "update for unknown id ignored");
                return Ok(());
            };
            patch.apply(record);
            postings.clone()
        };
        self.push_postings(snapshot);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let snapshot = {
            let mut postings = self.postings.lock().unwrap();
            let before = postings.len();
            postings.retain(|record| record.id != id);
            if postings.len() == before {
                debug!(target = "rozgar::store", posting_id = %id, "delete for unknown id ignored");
                return Ok(());
            }
            postings.clone()
        };
        self.push_postings(snapshot);
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    fn subscribe(&self) -> watch::Receiver<Option<SiteSettingsRecord>> {
        self.settings_tx.subscribe()
    }

    async fn ensure_settings(&self) -> Result<SiteSettingsRecord, StoreError> {
        let current = {
            let mut settings = self.settings.lock().unwrap();
            settings
                .get_or_insert_with(SiteSettingsRecord::initial)
                .clone()
        };
        self.settings_tx.send_replace(Some(current.clone()));
        Ok(current)
    }

    async fn write_settings(&self, settings: SiteSettingsRecord) -> Result<(), StoreError> {
        *self.settings.lock().unwrap() = Some(settings.clone());
        self.settings_tx.send_replace(Some(settings));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::domain::types::{Category, PostingStatus};

    fn new_posting(title: &str, status: PostingStatus) -> NewPosting {
        NewPosting {
            title: title.to_string(),
            department: "SSC".to_string(),
            category: Category::LatestJobs,
            status,
            publish_at: None,
            last_date: "Refer Notification".to_string(),
            link: "https://example.gov.in/apply".to_string(),
            notification_link: None,
            official_website: None,
            short_info: None,
            important_dates: None,
            fee: None,
            age_limit: None,
            total_posts: None,
            vacancy_details: None,
            eligibility: None,
            how_to_apply: None,
            selection_process: None,
        }
    }

    #[tokio::test]
    async fn create_pushes_newest_first_snapshot() {
        let store = MemoryStore::new();
        let receiver = PostingsStore::subscribe(&store);

        store
            .create(new_posting("first", PostingStatus::Published))
            .await
            .unwrap();
        store
            .create(new_posting("second", PostingStatus::Published))
            .await
            .unwrap();

        let snapshot = receiver.borrow().clone();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].title, "second");
        assert_eq!(snapshot[1].title, "first");
    }

    #[tokio::test]
    async fn full_field_set_survives_create_and_update() {
        let store = MemoryStore::new();
        let mut posting = new_posting("UPSSSC Lekhpal", PostingStatus::Draft);
        posting.short_info = Some("Detailed recruitment summary".to_string());
        posting.fee = Some("General: 25".to_string());

        let created = store.create(posting).await.unwrap();
        assert_eq!(created.short_info.as_deref(), Some("Detailed recruitment summary"));

        let patch = PostingPatch {
            status: Some(PostingStatus::Published),
            fee: Some(None),
            ..Default::default()
        };
        store.update(created.id, patch).await.unwrap();

        let snapshot = PostingsStore::subscribe(&store).borrow().clone();
        let updated = snapshot.iter().find(|r| r.id == created.id).unwrap();
        assert_eq!(updated.status, PostingStatus::Published);
        assert_eq!(updated.fee, None);
        assert_eq!(updated.short_info.as_deref(), Some("Detailed recruitment summary"));
    }

    #[tokio::test]
    async fn unknown_id_update_and_delete_are_no_ops() {
        let store = MemoryStore::new();
        store
            .create(new_posting("kept", PostingStatus::Published))
            .await
            .unwrap();
        let mut receiver = PostingsStore::subscribe(&store);
        receiver.mark_unchanged();

        store
            .update(Uuid::new_v4(), PostingPatch::default())
            .await
            .unwrap();
        store.delete(Uuid::new_v4()).await.unwrap();

        // No snapshot was pushed for either no-op.
        assert!(!receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow().len(), 1);
    }

    #[tokio::test]
    async fn delete_pushes_shrunk_snapshot() {
        let store = MemoryStore::new();
        let created = store
            .create(new_posting("gone", PostingStatus::Published))
            .await
            .unwrap();
        store.delete(created.id).await.unwrap();
        assert!(PostingsStore::subscribe(&store).borrow().is_empty());
    }

    #[tokio::test]
    async fn ensure_settings_writes_defaults_once() {
        let store = MemoryStore::new();
        let receiver = SettingsStore::subscribe(&store);
        assert!(receiver.borrow().is_none());

        let first = store.ensure_settings().await.unwrap();
        assert_eq!(first.site_name, "SARKARI RESULT LIVE");

        let mut custom = first.clone();
        custom.site_name = "ROZGAR PORTAL".to_string();
        store.write_settings(custom.clone()).await.unwrap();

        // A later ensure keeps the written document.
        let again = store.ensure_settings().await.unwrap();
        assert_eq!(again, custom);
        assert_eq!(receiver.borrow().as_ref(), Some(&custom));
    }

    #[tokio::test]
    async fn scheduled_publish_timestamp_round_trips() {
        let store = MemoryStore::new();
        let mut posting = new_posting("scheduled", PostingStatus::Scheduled);
        posting.publish_at = Some(datetime!(2025-06-01 09:00 UTC));
        let created = store.create(posting).await.unwrap();
        assert_eq!(created.publish_at, Some(datetime!(2025-06-01 09:00 UTC)));
    }
}
