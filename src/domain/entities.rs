//! Domain entities mirrored from the document store.

use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::types::{Category, PostingStatus};

/// A single job/recruitment announcement record.
///
/// The store owns canonical state; every in-process copy is a disposable
/// projection rebuilt from subscription pushes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostingRecord {
    pub id: Uuid,
    pub title: String,
    pub department: String,
    pub category: Category,
    pub status: PostingStatus,
    /// Scheduled-publish instant; meaningful only for scheduled postings.
    pub publish_at: Option<OffsetDateTime>,
    /// Calendar date the record was created, stamped by the store.
    pub posted_date: Date,
    pub last_date: String,
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
    pub created_at: OffsetDateTime,
}

/// Submit-time shape for a new posting. The store assigns the id and stamps
/// `posted_date`/`created_at`.
#[derive(Debug, Clone)]
pub struct NewPosting {
    pub title: String,
    pub department: String,
    pub category: Category,
    pub status: PostingStatus,
    pub publish_at: Option<OffsetDateTime>,
    pub last_date: String,
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
}

/// Partial update applied field-by-field; `None` leaves the stored value
/// untouched. Last writer wins, there are no concurrency tokens.
#[derive(Debug, Clone, Default)]
pub struct PostingPatch {
    pub title: Option<String>,
    pub department: Option<String>,
    pub category: Option<Category>,
    pub status: Option<PostingStatus>,
    pub publish_at: Option<Option<OffsetDateTime>>,
    pub last_date: Option<String>,
    pub link: Option<String>,
    pub notification_link: Option<Option<String>>,
    pub official_website: Option<Option<String>>,
    pub short_info: Option<Option<String>>,
    pub important_dates: Option<Option<String>>,
    pub fee: Option<Option<String>>,
    pub age_limit: Option<Option<String>>,
    pub total_posts: Option<Option<String>>,
    pub vacancy_details: Option<Option<String>>,
    pub eligibility: Option<Option<String>>,
    pub how_to_apply: Option<Option<String>>,
    pub selection_process: Option<Option<String>>,
}

impl PostingPatch {
    /// Merge this patch into an existing record, producing the stored image.
    pub fn apply(self, record: &mut PostingRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(department) = self.department {
            record.department = department;
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(publish_at) = self.publish_at {
            record.publish_at = publish_at;
        }
        if let Some(last_date) = self.last_date {
            record.last_date = last_date;
        }
        if let Some(link) = self.link {
            record.link = link;
        }
        if let Some(notification_link) = self.notification_link {
            record.notification_link = notification_link;
        }
        if let Some(official_website) = self.official_website {
            record.official_website = official_website;
        }
        if let Some(short_info) = self.short_info {
            record.short_info = short_info;
        }
        if let Some(important_dates) = self.important_dates {
            record.important_dates = important_dates;
        }
        if let Some(fee) = self.fee {
            record.fee = fee;
        }
        if let Some(age_limit) = self.age_limit {
            record.age_limit = age_limit;
        }
        if let Some(total_posts) = self.total_posts {
            record.total_posts = total_posts;
        }
        if let Some(vacancy_details) = self.vacancy_details {
            record.vacancy_details = vacancy_details;
        }
        if let Some(eligibility) = self.eligibility {
            record.eligibility = eligibility;
        }
        if let Some(how_to_apply) = self.how_to_apply {
            record.how_to_apply = how_to_apply;
        }
        if let Some(selection_process) = self.selection_process {
            record.selection_process = selection_process;
        }
    }
}

/// Singleton settings document: branding, community links, ad placements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSettingsRecord {
    pub site_name: String,
    pub footer_text: String,
    pub telegram_link: String,
    pub whatsapp_link: String,
    pub publisher_id: String,
    pub ad_slot_top: String,
    pub ad_slot_side: String,
    pub ad_slot_bottom: String,
}

impl SiteSettingsRecord {
    /// Defaults written on first read when no settings document exists.
    pub fn initial() -> Self {
        Self {
            site_name: "SARKARI RESULT LIVE".to_string(),
            footer_text: "WWW.SARKARIRESULTLIVE.COM".to_string(),
            telegram_link: "https://t.me/sarkariresult".to_string(),
            whatsapp_link: "https://wa.me/yourgroup".to_string(),
            publisher_id: String::new(),
            ad_slot_top: String::new(),
            ad_slot_side: String::new(),
            ad_slot_bottom: String::new(),
        }
    }
}

/// AI-sourced staging entry; lives only in admin-session memory until it is
/// promoted into a posting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredCandidate {
    pub title: String,
    pub source_url: String,
}
