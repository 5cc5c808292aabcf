//! Posting lifecycle commands driven by the admin console.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::application::store::{PostingsStore, StoreError};
use crate::domain::entities::{NewPosting, PostingPatch, PostingRecord};
use crate::domain::postings::derive_last_date;
use crate::domain::types::{Category, PostingStatus};

/// Summaries shorter than this require an explicit confirmation before the
/// posting is submitted without AI assistance.
pub const MIN_SUMMARY_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum AdminPostingError {
    /// Summary missing or below [`MIN_SUMMARY_CHARS`]; the caller must
    /// re-submit with the confirmation flag set or fill the summary first.
    #[error("summary is missing or shorter than {MIN_SUMMARY_CHARS} characters")]
    ShortSummary,
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Full form image submitted by the editor. Create and edit share this
/// shape; an edit turns it into a whole-record patch.
#[derive(Debug, Clone)]
pub struct SubmitPostingCommand {
    pub title: String,
    pub department: String,
    pub category: Category,
    pub status: PostingStatus,
    pub publish_at: Option<OffsetDateTime>,
    pub link: String,
    pub notification_link: Option<String>,
    pub official_website: Option<String>,
    pub short_info: Option<String>,
    pub important_dates: Option<String>,
    pub fee: Option<String>,
    pub age_limit: Option<String>,
    pub total_posts: Option<String>,
    pub vacancy_details: Option<String>,
    pub eligibility: Option<String>,
    pub how_to_apply: Option<String>,
    pub selection_process: Option<String>,
    /// Set when the operator has confirmed publishing with a short summary.
    pub confirm_short_summary: bool,
}

#[derive(Clone)]
pub struct AdminPostingService {
    store: Arc<dyn PostingsStore>,
}

impl AdminPostingService {
    pub fn new(store: Arc<dyn PostingsStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        command: SubmitPostingCommand,
    ) -> Result<PostingRecord, AdminPostingError> {
        self.validate(&command)?;
        let last_date = derive_last_date(command.important_dates.as_deref());
        let posting = NewPosting {
            title: command.title,
            department: command.department,
            category: command.category,
            status: command.status,
            publish_at: command.publish_at,
            last_date,
            link: command.link,
            notification_link: command.notification_link,
            official_website: command.official_website,
            short_info: command.short_info,
            important_dates: command.important_dates,
            fee: command.fee,
            age_limit: command.age_limit,
            total_posts: command.total_posts,
            vacancy_details: command.vacancy_details,
            eligibility: command.eligibility,
            how_to_apply: command.how_to_apply,
            selection_process: command.selection_process,
        };
        Ok(self.store.create(posting).await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        command: SubmitPostingCommand,
    ) -> Result<(), AdminPostingError> {
        self.validate(&command)?;
        let last_date = derive_last_date(command.important_dates.as_deref());
        let patch = PostingPatch {
            title: Some(command.title),
            department: Some(command.department),
            category: Some(command.category),
            status: Some(command.status),
            publish_at: Some(command.publish_at),
            last_date: Some(last_date),
            link: Some(command.link),
            notification_link: Some(command.notification_link),
            official_website: Some(command.official_website),
            short_info: Some(command.short_info),
            important_dates: Some(command.important_dates),
            fee: Some(command.fee),
            age_limit: Some(command.age_limit),
            total_posts: Some(command.total_posts),
            vacancy_details: Some(command.vacancy_details),
            eligibility: Some(command.eligibility),
            how_to_apply: Some(command.how_to_apply),
            selection_process: Some(command.selection_process),
        };
        Ok(self.store.update(id, patch).await?)
    }

    /// Deletion is confirmed interactively by the console before the
    /// request reaches this service.
    pub async fn delete(&self, id: Uuid) -> Result<(), AdminPostingError> {
        Ok(self.store.delete(id).await?)
    }

    pub fn find(&self, id: Uuid) -> Option<PostingRecord> {
        self.store
            .subscribe()
            .borrow()
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Manage-tab listing: postings in one status bucket, raw collection
    /// order (newest first).
    pub fn list(&self, status: PostingStatus) -> Vec<PostingRecord> {
        self.store
            .subscribe()
            .borrow()
            .iter()
            .filter(|record| record.status == status)
            .cloned()
            .collect()
    }

    fn validate(&self, command: &SubmitPostingCommand) -> Result<(), AdminPostingError> {
        if command.title.trim().is_empty() {
            return Err(AdminPostingError::ConstraintViolation("title"));
        }
        if command.department.trim().is_empty() {
            return Err(AdminPostingError::ConstraintViolation("department"));
        }
        let summary_len = command
            .short_info
            .as_deref()
            .map(|text| text.trim().chars().count())
            .unwrap_or(0);
        if summary_len < MIN_SUMMARY_CHARS && !command.confirm_short_summary {
            return Err(AdminPostingError::ShortSummary);
        }
        if command.status == PostingStatus::Scheduled && command.publish_at.is_none() {
            // Not rejected: such a posting is immediately live under the
            // fail-open gate. Flag it for the operator logs.
            warn!(
                target = "rozgar::admin",
                title = %command.title,
                "scheduled posting submitted without a publish timestamp",
            );
        }
        Ok(())
    }
}
