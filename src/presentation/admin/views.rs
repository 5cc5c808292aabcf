//! Admin console view models and templates.

use askama::Template;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use uuid::Uuid;

use crate::domain::entities::{DiscoveredCandidate, PostingRecord, SiteSettingsRecord};
use crate::domain::postings::format_human_date;
use crate::domain::types::{ALL_CATEGORIES, Category, PostingStatus};

/// Wire format of `<input type="datetime-local">`.
pub const DATETIME_LOCAL_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

const SCHEDULE_DISPLAY_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[day padding:none] [month repr:long] [year], [hour]:[minute] UTC");

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ManageRow {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub posted_date: String,
    /// Display form of the publish instant; set only for scheduled rows.
    pub scheduled_for: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/manage.html")]
pub struct ManageTemplate {
    pub active_status: PostingStatus,
    pub rows: Vec<ManageRow>,
}

impl ManageTemplate {
    pub fn new(active_status: PostingStatus, records: Vec<PostingRecord>) -> Self {
        let rows = records
            .into_iter()
            .map(|record| {
                let scheduled_for = (record.status == PostingStatus::Scheduled).then(|| {
                    record
                        .publish_at
                        .and_then(|instant| instant.format(SCHEDULE_DISPLAY_FORMAT).ok())
                        .unwrap_or_else(|| "No timestamp".to_string())
                });
                ManageRow {
                    id: record.id,
                    title: record.title,
                    category: record.category,
                    posted_date: format_human_date(record.posted_date),
                    scheduled_for,
                }
            })
            .collect();
        Self {
            active_status,
            rows,
        }
    }
}

/// Editable form image. Every field is a string so a rejected submission
/// re-renders exactly what the operator typed.
#[derive(Debug, Clone)]
pub struct EditorForm {
    /// Stable per-form key used to single-flight AI requests.
    pub form_id: Uuid,
    pub id: Option<Uuid>,
    pub title: String,
    pub department: String,
    pub category: String,
    pub status: String,
    pub publish_at: String,
    pub link: String,
    pub notification_link: String,
    pub official_website: String,
    pub short_info: String,
    pub important_dates: String,
    pub fee: String,
    pub age_limit: String,
    pub total_posts: String,
    pub vacancy_details: String,
    pub eligibility: String,
    pub how_to_apply: String,
    pub selection_process: String,
}

impl EditorForm {
    pub fn blank() -> Self {
        Self {
            form_id: Uuid::new_v4(),
            id: None,
            title: String::new(),
            department: String::new(),
            category: Category::LatestJobs.as_str().to_string(),
            status: PostingStatus::Published.as_str().to_string(),
            publish_at: String::new(),
            link: String::new(),
            notification_link: String::new(),
            official_website: String::new(),
            short_info: String::new(),
            important_dates: String::new(),
            fee: String::new(),
            age_limit: String::new(),
            total_posts: String::new(),
            vacancy_details: String::new(),
            eligibility: String::new(),
            how_to_apply: String::new(),
            selection_process: String::new(),
        }
    }

    pub fn from_record(record: &PostingRecord) -> Self {
        let publish_at = record
            .publish_at
            .and_then(|instant| instant.format(DATETIME_LOCAL_FORMAT).ok())
            .unwrap_or_default();
        Self {
            form_id: Uuid::new_v4(),
            id: Some(record.id),
            title: record.title.clone(),
            department: record.department.clone(),
            category: record.category.as_str().to_string(),
            status: record.status.as_str().to_string(),
            publish_at,
            link: record.link.clone(),
            notification_link: record.notification_link.clone().unwrap_or_default(),
            official_website: record.official_website.clone().unwrap_or_default(),
            short_info: record.short_info.clone().unwrap_or_default(),
            important_dates: record.important_dates.clone().unwrap_or_default(),
            fee: record.fee.clone().unwrap_or_default(),
            age_limit: record.age_limit.clone().unwrap_or_default(),
            total_posts: record.total_posts.clone().unwrap_or_default(),
            vacancy_details: record.vacancy_details.clone().unwrap_or_default(),
            eligibility: record.eligibility.clone().unwrap_or_default(),
            how_to_apply: record.how_to_apply.clone().unwrap_or_default(),
            selection_process: record.selection_process.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/editor.html")]
pub struct EditorTemplate {
    pub form: EditorForm,
    pub categories: Vec<Category>,
    pub ai_enabled: bool,
    pub error: Option<String>,
    /// Set when the previous submission bounced on the short-summary guard;
    /// the re-rendered form carries the confirmation checkbox.
    pub ask_short_summary: bool,
}

impl EditorTemplate {
    pub fn new(form: EditorForm, ai_enabled: bool) -> Self {
        Self {
            form,
            categories: ALL_CATEGORIES.to_vec(),
            ai_enabled,
            error: None,
            ask_short_summary: false,
        }
    }
}

#[derive(Template)]
#[template(path = "admin/settings.html")]
pub struct SettingsTemplate {
    pub form: SiteSettingsRecord,
    pub saved: bool,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/candidates.html")]
pub struct CandidatesTemplate {
    pub candidates: Vec<DiscoveredCandidate>,
    pub error: Option<String>,
}
