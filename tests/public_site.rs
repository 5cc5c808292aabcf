use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

use rozgar::application::feed::FeedService;
use rozgar::application::store::{PostingsStore, SettingsStore};
use rozgar::domain::entities::NewPosting;
use rozgar::domain::postings::ScheduleGate;
use rozgar::domain::types::{Category, PostingStatus};
use rozgar::infra::http::{PublicState, build_public_router};
use rozgar::infra::store::MemoryStore;

fn public_router(store: &Arc<MemoryStore>, gate: ScheduleGate) -> Router {
    let postings: Arc<dyn PostingsStore> = store.clone();
    let settings: Arc<dyn SettingsStore> = store.clone();
    let feed = Arc::new(FeedService::new(
        postings.subscribe(),
        settings.subscribe(),
        gate,
    ));
    build_public_router(PublicState { feed })
}

fn announcement(title: &str, category: Category, status: PostingStatus) -> NewPosting {
    NewPosting {
        title: title.to_string(),
        department: "Staff Selection Commission".to_string(),
        category,
        status,
        publish_at: None,
        last_date: "Refer Notification".to_string(),
        link: "https://ssc.gov.in/apply".to_string(),
        notification_link: None,
        official_website: Some("https://ssc.gov.in".to_string()),
        short_info: Some("Recruitment notification for eligible candidates.".to_string()),
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

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn home_holds_on_connecting_until_settings_arrive() {
    let store = Arc::new(MemoryStore::new());
    let router = public_router(&store, ScheduleGate::FailOpen);

    let (status, body) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Connecting to the live feed"));

    let settings_store: Arc<dyn SettingsStore> = store.clone();
    settings_store.ensure_settings().await.unwrap();

    let (status, body) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("SARKARI RESULT LIVE"));
    assert!(!body.contains("Connecting to the live feed"));
}

#[tokio::test]
async fn home_lists_only_live_postings() {
    let store = Arc::new(MemoryStore::new());
    let settings_store: Arc<dyn SettingsStore> = store.clone();
    settings_store.ensure_settings().await.unwrap();
    let postings: Arc<dyn PostingsStore> = store.clone();

    postings
        .create(announcement(
            "SSC CGL 2026 Online Form",
            Category::LatestJobs,
            PostingStatus::Published,
        ))
        .await
        .unwrap();
    postings
        .create(announcement(
            "Unfinished Draft Posting",
            Category::LatestJobs,
            PostingStatus::Draft,
        ))
        .await
        .unwrap();
    let mut future = announcement(
        "Embargoed Until Next Week",
        Category::LatestJobs,
        PostingStatus::Scheduled,
    );
    future.publish_at = Some(OffsetDateTime::now_utc() + Duration::days(7));
    postings.create(future).await.unwrap();

    let router = public_router(&store, ScheduleGate::FailOpen);
    let (status, body) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("SSC CGL 2026 Online Form"));
    assert!(!body.contains("Unfinished Draft Posting"));
    assert!(!body.contains("Embargoed Until Next Week"));
}

#[tokio::test]
async fn due_scheduled_posting_goes_live_without_a_rewrite() {
    let store = Arc::new(MemoryStore::new());
    let settings_store: Arc<dyn SettingsStore> = store.clone();
    settings_store.ensure_settings().await.unwrap();
    let postings: Arc<dyn PostingsStore> = store.clone();

    let mut due = announcement(
        "RRB NTPC Result Declared",
        Category::Result,
        PostingStatus::Scheduled,
    );
    due.publish_at = Some(OffsetDateTime::now_utc() - Duration::hours(1));
    postings.create(due).await.unwrap();

    let router = public_router(&store, ScheduleGate::FailOpen);
    let (status, body) = get(&router, "/category/result").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("RRB NTPC Result Declared"));
}

#[tokio::test]
async fn search_narrows_the_home_grids() {
    let store = Arc::new(MemoryStore::new());
    let settings_store: Arc<dyn SettingsStore> = store.clone();
    settings_store.ensure_settings().await.unwrap();
    let postings: Arc<dyn PostingsStore> = store.clone();

    postings
        .create(announcement(
            "UPSC Civil Services Prelims",
            Category::LatestJobs,
            PostingStatus::Published,
        ))
        .await
        .unwrap();
    postings
        .create(announcement(
            "Indian Navy Agniveer Batch",
            Category::LatestJobs,
            PostingStatus::Published,
        ))
        .await
        .unwrap();

    let router = public_router(&store, ScheduleGate::FailOpen);
    let (status, body) = get(&router, "/?q=navy").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Indian Navy Agniveer Batch"));
}

#[tokio::test]
async fn home_ad_slots_render_from_settings() {
    let store = Arc::new(MemoryStore::new());
    let settings_store: Arc<dyn SettingsStore> = store.clone();
    let defaults = settings_store.ensure_settings().await.unwrap();

    let router = public_router(&store, ScheduleGate::FailOpen);

    // No publisher configured: the reserved blocks still render.
    let (status, body) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Ad slot reserved"));

    let mut configured = defaults;
    configured.publisher_id = "pub-4791".to_string();
    configured.ad_slot_top = "1111".to_string();
    configured.ad_slot_bottom = "2222".to_string();
    settings_store.write_settings(configured).await.unwrap();

    let (status, body) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("data-ad-client=\"pub-4791\""));
    assert!(body.contains("data-ad-slot=\"1111\""));
    assert!(body.contains("data-ad-slot=\"2222\""));
    assert!(!body.contains("Ad slot reserved"));
}

#[tokio::test]
async fn posting_detail_renders_and_unknown_id_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let settings_store: Arc<dyn SettingsStore> = store.clone();
    settings_store.ensure_settings().await.unwrap();
    let postings: Arc<dyn PostingsStore> = store.clone();

    let record = postings
        .create(announcement(
            "IBPS PO Admit Card",
            Category::AdmitCard,
            PostingStatus::Published,
        ))
        .await
        .unwrap();

    let router = public_router(&store, ScheduleGate::FailOpen);

    let (status, body) = get(&router, &format!("/postings/{}", record.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("IBPS PO Admit Card"));
    assert!(body.contains("Apply Online"));

    let (status, body) = get(
        &router,
        "/postings/00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404"));
}

#[tokio::test]
async fn draft_detail_does_not_exist_publicly() {
    let store = Arc::new(MemoryStore::new());
    let settings_store: Arc<dyn SettingsStore> = store.clone();
    settings_store.ensure_settings().await.unwrap();
    let postings: Arc<dyn PostingsStore> = store.clone();

    let record = postings
        .create(announcement(
            "Hidden Draft",
            Category::Important,
            PostingStatus::Draft,
        ))
        .await
        .unwrap();

    let router = public_router(&store, ScheduleGate::FailOpen);
    let (status, _) = get(&router, &format!("/postings/{}", record.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_category_slug_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let settings_store: Arc<dyn SettingsStore> = store.clone();
    settings_store.ensure_settings().await.unwrap();

    let router = public_router(&store, ScheduleGate::FailOpen);
    let (status, _) = get(&router, "/category/no-such-section").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint_answers_without_settings() {
    let store = Arc::new(MemoryStore::new());
    let router = public_router(&store, ScheduleGate::FailOpen);

    let response = router
        .oneshot(Request::builder().uri("/_health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn bundled_stylesheet_is_served_with_its_mime_type() {
    let store = Arc::new(MemoryStore::new());
    let router = public_router(&store, ScheduleGate::FailOpen);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/static/css/site.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/css"));
}
