//! Read-side projection service for the public surfaces.
//!
//! The service borrows the latest snapshots from the store subscriptions
//! and recomputes visibility on every call; nothing is cached and nothing
//! is written back. Rendering is deferred (`FeedState::Connecting`) until
//! both subscriptions have delivered at least once — the two channels are
//! independent and may arrive in any order.

use time::OffsetDateTime;
use tokio::sync::watch;
use uuid::Uuid;

use crate::domain::entities::{PostingRecord, SiteSettingsRecord};
use crate::domain::postings::{
    self, BREAKING_LIMIT, MAJOR_GRID_LIMIT, MINOR_GRID_LIMIT, ScheduleGate, TICKER_LIMIT,
};
use crate::domain::types::Category;

/// Categories shown as the three major home-page grids, in display order.
pub const MAJOR_SECTIONS: [Category; 3] =
    [Category::Result, Category::AdmitCard, Category::LatestJobs];
/// Categories shown as the three minor home-page grids, in display order.
pub const MINOR_SECTIONS: [Category; 3] =
    [Category::Important, Category::AnswerKey, Category::Admission];

/// Either a rendered projection or the indefinite connecting state shown
/// while the settings singleton has not delivered yet.
pub enum FeedState<T> {
    Connecting,
    Ready(T),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostingSummary {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub posted_date: String,
    pub is_new: bool,
}

#[derive(Debug, Clone)]
pub struct CategorySection {
    pub category: Category,
    pub postings: Vec<PostingSummary>,
}

#[derive(Debug, Clone)]
pub struct HomeFeed {
    pub settings: SiteSettingsRecord,
    pub search: String,
    pub ticker: Vec<PostingSummary>,
    pub breaking: Vec<PostingSummary>,
    pub major_sections: Vec<CategorySection>,
    pub minor_sections: Vec<CategorySection>,
}

#[derive(Debug, Clone)]
pub struct CategoryFeed {
    pub settings: SiteSettingsRecord,
    pub category: Category,
    pub postings: Vec<PostingSummary>,
}

#[derive(Debug, Clone)]
pub struct DetailFeed {
    pub settings: SiteSettingsRecord,
    pub posting: PostingRecord,
}

/// Snapshot pushed to the datastar live stream.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveStrips {
    pub ticker: Vec<PostingSummary>,
    pub breaking: Vec<PostingSummary>,
}

pub struct FeedService {
    postings: watch::Receiver<Vec<PostingRecord>>,
    settings: watch::Receiver<Option<SiteSettingsRecord>>,
    gate: ScheduleGate,
}

impl FeedService {
    pub fn new(
        postings: watch::Receiver<Vec<PostingRecord>>,
        settings: watch::Receiver<Option<SiteSettingsRecord>>,
        gate: ScheduleGate,
    ) -> Self {
        Self {
            postings,
            settings,
            gate,
        }
    }

    pub fn gate(&self) -> ScheduleGate {
        self.gate
    }

    /// Receiver for change notifications; used by the live SSE stream.
    pub fn watch_postings(&self) -> watch::Receiver<Vec<PostingRecord>> {
        self.postings.clone()
    }

    /// Latest settings document, if it has been delivered yet.
    pub fn settings_snapshot(&self) -> Option<SiteSettingsRecord> {
        self.settings.borrow().clone()
    }

    pub fn home(&self, search: &str, now: OffsetDateTime) -> FeedState<HomeFeed> {
        let Some(settings) = self.settings_snapshot() else {
            return FeedState::Connecting;
        };
        let snapshot = self.postings.borrow().clone();
        let live = postings::live_view(&snapshot, now, self.gate);
        let filtered = postings::search_filter(&live, search);

        let major_sections = MAJOR_SECTIONS
            .into_iter()
            .map(|category| CategorySection {
                category,
                postings: summaries(
                    &postings::category_slice(&filtered, category, Some(MAJOR_GRID_LIMIT)),
                    now,
                ),
            })
            .collect();
        let minor_sections = MINOR_SECTIONS
            .into_iter()
            .map(|category| CategorySection {
                category,
                postings: summaries(
                    &postings::category_slice(&live, category, Some(MINOR_GRID_LIMIT)),
                    now,
                ),
            })
            .collect();

        FeedState::Ready(HomeFeed {
            settings,
            search: search.to_string(),
            ticker: summaries(&live[..live.len().min(TICKER_LIMIT)], now),
            breaking: summaries(&live[..live.len().min(BREAKING_LIMIT)], now),
            major_sections,
            minor_sections,
        })
    }

    pub fn category(&self, category: Category, now: OffsetDateTime) -> FeedState<CategoryFeed> {
        let Some(settings) = self.settings_snapshot() else {
            return FeedState::Connecting;
        };
        let snapshot = self.postings.borrow().clone();
        let live = postings::live_view(&snapshot, now, self.gate);

        FeedState::Ready(CategoryFeed {
            settings,
            category,
            postings: summaries(&postings::category_slice(&live, category, None), now),
        })
    }

    /// Resolve a posting for the public detail page. Postings outside the
    /// live view do not exist publicly.
    pub fn posting(&self, id: Uuid, now: OffsetDateTime) -> FeedState<Option<DetailFeed>> {
        let Some(settings) = self.settings_snapshot() else {
            return FeedState::Connecting;
        };
        let snapshot = self.postings.borrow().clone();
        let posting = snapshot
            .iter()
            .find(|record| record.id == id)
            .filter(|record| postings::is_live(record, now, self.gate))
            .cloned();

        FeedState::Ready(posting.map(|posting| DetailFeed { settings, posting }))
    }

    pub fn live_strips(&self, now: OffsetDateTime) -> LiveStrips {
        let snapshot = self.postings.borrow().clone();
        let live = postings::live_view(&snapshot, now, self.gate);
        LiveStrips {
            ticker: summaries(&live[..live.len().min(TICKER_LIMIT)], now),
            breaking: summaries(&live[..live.len().min(BREAKING_LIMIT)], now),
        }
    }
}

fn summaries(records: &[&PostingRecord], now: OffsetDateTime) -> Vec<PostingSummary> {
    records
        .iter()
        .map(|record| PostingSummary {
            id: record.id,
            title: record.title.clone(),
            category: record.category,
            posted_date: postings::format_human_date(record.posted_date),
            is_new: postings::is_recently_added(record.posted_date, now),
        })
        .collect()
}
