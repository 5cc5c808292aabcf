//! Content lifecycle core: the live-view projection over the raw posting
//! collection, plus the pure helpers the public surfaces partition with.
//!
//! Visibility is recomputed on every evaluation from `status`, `publish_at`
//! and the current instant; nothing here mutates stored state.

use time::{Date, Duration, OffsetDateTime, format_description::FormatItem, macros::format_description};

use crate::domain::entities::PostingRecord;
use crate::domain::types::{Category, PostingStatus};

/// Postings in the breaking strip on the home page.
pub const BREAKING_LIMIT: usize = 6;
/// Postings per major category grid (Result / Admit Card / Latest Jobs).
pub const MAJOR_GRID_LIMIT: usize = 18;
/// Postings per minor category grid (Important / Answer Key / Admission).
pub const MINOR_GRID_LIMIT: usize = 10;
/// Postings in the marquee ticker.
pub const TICKER_LIMIT: usize = 10;
/// Window after `posted_date` in which a posting carries the "new" badge.
pub const RECENT_WINDOW: Duration = Duration::days(4);
/// Placeholder when no closing date can be derived from the dates field.
pub const LAST_DATE_PLACEHOLDER: &str = "Refer Notification";

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[day padding:none] [month repr:long] [year]");

/// Policy for a scheduled posting that carries no publish timestamp.
///
/// The observed upstream behavior is fail-open (immediately visible); the
/// gate exists so an operator can opt into fail-closed instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleGate {
    #[default]
    FailOpen,
    FailClosed,
}

/// Project the raw collection onto the publicly visible subset.
///
/// Order-preserving: the result is a subsequence of the input, which the
/// store delivers newest-first. Pure function of its inputs; malformed
/// optional fields never make it error.
pub fn live_view<'a>(
    postings: &'a [PostingRecord],
    now: OffsetDateTime,
    gate: ScheduleGate,
) -> Vec<&'a PostingRecord> {
    postings
        .iter()
        .filter(|posting| is_live(posting, now, gate))
        .collect()
}

/// Visibility test for a single posting at `now`.
///
/// The scheduled boundary is inclusive: a posting becomes visible at
/// exactly its publish instant.
pub fn is_live(posting: &PostingRecord, now: OffsetDateTime, gate: ScheduleGate) -> bool {
    match posting.status {
        PostingStatus::Draft => false,
        PostingStatus::Published => true,
        PostingStatus::Scheduled => match posting.publish_at {
            Some(publish_at) => publish_at <= now,
            None => {
                tracing::warn!(
                    target = "rozgar::lifecycle",
                    posting_id = %posting.id,
                    "scheduled posting has no publish timestamp",
                );
                matches!(gate, ScheduleGate::FailOpen)
            }
        },
    }
}

/// Case-insensitive substring match against title or department.
pub fn matches_search(posting: &PostingRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    posting.title.to_lowercase().contains(&needle)
        || posting.department.to_lowercase().contains(&needle)
}

pub fn search_filter<'a>(
    postings: &[&'a PostingRecord],
    query: &str,
) -> Vec<&'a PostingRecord> {
    postings
        .iter()
        .copied()
        .filter(|posting| matches_search(posting, query))
        .collect()
}

/// Stable filter-and-slice for one category. `None` means unbounded.
pub fn category_slice<'a>(
    postings: &[&'a PostingRecord],
    category: Category,
    limit: Option<usize>,
) -> Vec<&'a PostingRecord> {
    let matching = postings
        .iter()
        .copied()
        .filter(|posting| posting.category == category);
    match limit {
        Some(limit) => matching.take(limit).collect(),
        None => matching.collect(),
    }
}

/// Whether the posting was created within [`RECENT_WINDOW`] of `now`.
/// Cosmetic only, never part of the visibility invariant.
pub fn is_recently_added(posted_date: Date, now: OffsetDateTime) -> bool {
    let midnight = posted_date.midnight().assume_utc();
    now - midnight <= RECENT_WINDOW
}

/// Derive the closing date shown in list rows from the free-text dates
/// field; an empty field degrades to the placeholder literal.
pub fn derive_last_date(important_dates: Option<&str>) -> String {
    match important_dates.map(str::trim) {
        Some(text) if !text.is_empty() => text
            .lines()
            .next()
            .unwrap_or(LAST_DATE_PLACEHOLDER)
            .trim()
            .to_string(),
        _ => LAST_DATE_PLACEHOLDER.to_string(),
    }
}

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};
    use uuid::Uuid;

    use super::*;

    fn posting(title: &str, status: PostingStatus) -> PostingRecord {
        PostingRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            department: "Staff Selection Commission".to_string(),
            category: Category::LatestJobs,
            status,
            publish_at: None,
            posted_date: date!(2025 - 01 - 10),
            last_date: LAST_DATE_PLACEHOLDER.to_string(),
            link: "https://ssc.gov.in".to_string(),
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
            created_at: datetime!(2025-01-10 09:00 UTC),
        }
    }

    fn scheduled(title: &str, publish_at: Option<OffsetDateTime>) -> PostingRecord {
        let mut record = posting(title, PostingStatus::Scheduled);
        record.publish_at = publish_at;
        record
    }

    const NOW: OffsetDateTime = datetime!(2025-01-15 12:00 UTC);

    #[test]
    fn drafts_are_never_live() {
        let records = vec![posting("Draft one", PostingStatus::Draft)];
        for now in [
            datetime!(2000-01-01 00:00 UTC),
            NOW,
            datetime!(2099-12-31 23:59 UTC),
        ] {
            assert!(live_view(&records, now, ScheduleGate::FailOpen).is_empty());
        }
    }

    #[test]
    fn published_is_always_live() {
        let records = vec![posting("Clerk Exam", PostingStatus::Published)];
        assert_eq!(live_view(&records, NOW, ScheduleGate::FailOpen).len(), 1);
    }

    #[test]
    fn scheduled_is_gated_on_publish_instant() {
        let records = vec![scheduled(
            "Constable 2025",
            Some(datetime!(2025-01-01 00:00 UTC)),
        )];
        let before = datetime!(2024-12-31 23:59:59 UTC);
        let at = datetime!(2025-01-01 00:00:00 UTC);
        let after = datetime!(2025-01-01 00:00:01 UTC);

        assert!(live_view(&records, before, ScheduleGate::FailOpen).is_empty());
        // Boundary is inclusive.
        assert_eq!(live_view(&records, at, ScheduleGate::FailOpen).len(), 1);
        assert_eq!(live_view(&records, after, ScheduleGate::FailOpen).len(), 1);
    }

    #[test]
    fn scheduled_without_timestamp_follows_the_gate() {
        let records = vec![scheduled("No timestamp", None)];
        assert_eq!(live_view(&records, NOW, ScheduleGate::FailOpen).len(), 1);
        assert!(live_view(&records, NOW, ScheduleGate::FailClosed).is_empty());
    }

    #[test]
    fn live_view_preserves_input_order() {
        let records = vec![
            posting("first", PostingStatus::Published),
            posting("hidden", PostingStatus::Draft),
            scheduled("second", Some(datetime!(2025-01-02 00:00 UTC))),
            posting("third", PostingStatus::Published),
        ];
        let titles: Vec<&str> = live_view(&records, NOW, ScheduleGate::FailOpen)
            .iter()
            .map(|record| record.title.as_str())
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[test]
    fn category_slice_takes_first_n_in_order() {
        let records: Vec<PostingRecord> = (0..25)
            .map(|index| {
                let mut record = posting(&format!("Result {index}"), PostingStatus::Published);
                record.category = Category::Result;
                record
            })
            .collect();
        let live = live_view(&records, NOW, ScheduleGate::FailOpen);
        let sliced = category_slice(&live, Category::Result, Some(10));
        assert_eq!(sliced.len(), 10);
        for (index, record) in sliced.iter().enumerate() {
            assert_eq!(record.title, format!("Result {index}"));
        }
    }

    #[test]
    fn category_slice_is_exact_equality() {
        let mut admit = posting("Admit", PostingStatus::Published);
        admit.category = Category::AdmitCard;
        let records = vec![admit, posting("Job", PostingStatus::Published)];
        let live = live_view(&records, NOW, ScheduleGate::FailOpen);
        assert_eq!(category_slice(&live, Category::AdmitCard, None).len(), 1);
        assert_eq!(category_slice(&live, Category::Result, None).len(), 0);
    }

    #[test]
    fn search_is_case_insensitive_on_title_and_department() {
        let mut record = posting("Clerk Exam", PostingStatus::Published);
        record.department = "Allahabad High Court".to_string();
        let records = vec![record];
        let live = live_view(&records, NOW, ScheduleGate::FailOpen);

        assert_eq!(search_filter(&live, "exam").len(), 1);
        assert_eq!(search_filter(&live, "CLERK").len(), 1);
        assert_eq!(search_filter(&live, "allahabad").len(), 1);
        assert_eq!(search_filter(&live, "railway").len(), 0);
        assert_eq!(search_filter(&live, "").len(), 1);
    }

    #[test]
    fn recent_badge_uses_four_day_window() {
        let now = datetime!(2025-01-15 12:00 UTC);
        assert!(is_recently_added(date!(2025 - 01 - 14), now));
        assert!(is_recently_added(date!(2025 - 01 - 12), now));
        assert!(!is_recently_added(date!(2025 - 01 - 05), now));
    }

    #[test]
    fn last_date_takes_first_line_or_placeholder() {
        assert_eq!(
            derive_last_date(Some("Last Date: 10 Feb 2025\nExam: March")),
            "Last Date: 10 Feb 2025"
        );
        assert_eq!(derive_last_date(Some("  ")), LAST_DATE_PLACEHOLDER);
        assert_eq!(derive_last_date(None), LAST_DATE_PLACEHOLDER);
    }
}
