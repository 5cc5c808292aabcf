//! Shared domain enumerations for the posting collection.

use serde::{Deserialize, Serialize};

/// Closed set of portal categories. Display strings match the stored values
/// exactly; partitioning is an equality test, never fuzzy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Latest Jobs")]
    LatestJobs,
    #[serde(rename = "Admit Card")]
    AdmitCard,
    #[serde(rename = "Result")]
    Result,
    #[serde(rename = "Answer Key")]
    AnswerKey,
    #[serde(rename = "Important")]
    Important,
    #[serde(rename = "Admission")]
    Admission,
    #[serde(rename = "Certificate Verification")]
    CertificateVerification,
}

pub const ALL_CATEGORIES: [Category; 7] = [
    Category::LatestJobs,
    Category::AdmitCard,
    Category::Result,
    Category::AnswerKey,
    Category::Important,
    Category::Admission,
    Category::CertificateVerification,
];

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::LatestJobs => "Latest Jobs",
            Category::AdmitCard => "Admit Card",
            Category::Result => "Result",
            Category::AnswerKey => "Answer Key",
            Category::Important => "Important",
            Category::Admission => "Admission",
            Category::CertificateVerification => "Certificate Verification",
        }
    }

    /// URL-safe key used in route paths.
    pub fn slug(self) -> &'static str {
        match self {
            Category::LatestJobs => "latest-jobs",
            Category::AdmitCard => "admit-card",
            Category::Result => "result",
            Category::AnswerKey => "answer-key",
            Category::Important => "important",
            Category::Admission => "admission",
            Category::CertificateVerification => "certificate-verification",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        ALL_CATEGORIES
            .into_iter()
            .find(|category| category.slug() == value)
    }

    pub fn from_label(value: &str) -> Option<Self> {
        ALL_CATEGORIES
            .into_iter()
            .find(|category| category.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingStatus {
    Draft,
    Scheduled,
    Published,
}

impl PostingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostingStatus::Draft => "draft",
            PostingStatus::Scheduled => "scheduled",
            PostingStatus::Published => "published",
        }
    }

    /// Normalize a raw stored status at the store-adapter boundary.
    ///
    /// Legacy records carry no status at all; those are treated as
    /// published. Unknown strings degrade the same way rather than hiding
    /// the record.
    pub fn from_raw(value: Option<&str>) -> Self {
        match value {
            Some("draft") => PostingStatus::Draft,
            Some("scheduled") => PostingStatus::Scheduled,
            Some("published") | None => PostingStatus::Published,
            Some(_) => PostingStatus::Published,
        }
    }
}
