use std::convert::Infallible;
use std::sync::Arc;

use askama::Template;
use async_stream::stream;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
    routing::get,
};
use datastar::prelude::{ElementPatchMode, PatchElements};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::{
    application::feed::{FeedService, FeedState},
    infra::assets,
    presentation::views::{
        BreakingPartial, CategoryTemplate, HomeTemplate, PostingTemplate, TickerPartial,
        render_connecting_response, render_not_found_response, render_template_response,
    },
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct PublicState {
    pub feed: Arc<FeedService>,
}

pub fn build_public_router(state: PublicState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/category/{slug}", get(category_page))
        .route("/postings/{id}", get(posting_detail))
        .route("/ui/live", get(live_stream))
        .route("/_health", get(health))
        .route("/static/{*path}", get(assets::serve))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchQuery {
    q: String,
}

async fn home(State(state): State<PublicState>, Query(query): Query<SearchQuery>) -> Response {
    match state.feed.home(&query.q, OffsetDateTime::now_utc()) {
        FeedState::Connecting => render_connecting_response(),
        FeedState::Ready(view) => render_template_response(HomeTemplate { view }, StatusCode::OK),
    }
}

async fn category_page(State(state): State<PublicState>, Path(slug): Path<String>) -> Response {
    let Some(category) = crate::domain::types::Category::from_slug(&slug) else {
        return not_found(&state);
    };
    match state.feed.category(category, OffsetDateTime::now_utc()) {
        FeedState::Connecting => render_connecting_response(),
        FeedState::Ready(view) => {
            render_template_response(CategoryTemplate { view }, StatusCode::OK)
        }
    }
}

async fn posting_detail(State(state): State<PublicState>, Path(id): Path<Uuid>) -> Response {
    match state.feed.posting(id, OffsetDateTime::now_utc()) {
        FeedState::Connecting => render_connecting_response(),
        FeedState::Ready(Some(view)) => {
            render_template_response(PostingTemplate { view }, StatusCode::OK)
        }
        // Drafts and pending schedules do not exist publicly.
        FeedState::Ready(None) => not_found(&state),
    }
}

/// Datastar stream re-patching the ticker and breaking strips whenever the
/// store pushes a new snapshot. Dropping the connection drops the
/// subscription.
async fn live_stream(State(state): State<PublicState>) -> Response {
    let feed = state.feed.clone();
    let mut receiver = feed.watch_postings();

    let stream = stream! {
        loop {
            let strips = feed.live_strips(OffsetDateTime::now_utc());

            let ticker = TickerPartial { items: strips.ticker };
            if let Ok(html) = ticker.render() {
                yield Ok::<Event, Infallible>(
                    PatchElements::new(html)
                        .selector("#live-ticker")
                        .mode(ElementPatchMode::Outer)
                        .write_as_axum_sse_event(),
                );
            }

            let breaking = BreakingPartial { items: strips.breaking };
            if let Ok(html) = breaking.render() {
                yield Ok::<Event, Infallible>(
                    PatchElements::new(html)
                        .selector("#breaking-news")
                        .mode(ElementPatchMode::Outer)
                        .write_as_axum_sse_event(),
                );
            }

            if receiver.changed().await.is_err() {
                debug!(target = "rozgar::http", "store channel closed, ending live stream");
                break;
            }
        }
    };

    Sse::new(stream).into_response()
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback(State(state): State<PublicState>) -> Response {
    not_found(&state)
}

fn not_found(state: &PublicState) -> Response {
    match state.feed.settings_snapshot() {
        Some(settings) => render_not_found_response(settings),
        None => render_connecting_response(),
    }
}
