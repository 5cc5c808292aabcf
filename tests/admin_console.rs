use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use rozgar::application::admin::aifill::AiFillService;
use rozgar::application::admin::auth::AdminAuthService;
use rozgar::application::admin::candidates::CandidateLedger;
use rozgar::application::admin::postings::AdminPostingService;
use rozgar::application::admin::settings::AdminSettingsService;
use rozgar::application::store::{PostingsStore, SettingsStore};
use rozgar::infra::http::{AdminState, build_admin_router};
use rozgar::infra::store::MemoryStore;

const PASSWORD: &str = "letmein";

fn console(store: &Arc<MemoryStore>) -> Router {
    let postings: Arc<dyn PostingsStore> = store.clone();
    let settings: Arc<dyn SettingsStore> = store.clone();
    build_admin_router(AdminState {
        auth: Arc::new(AdminAuthService::new(PASSWORD)),
        postings: Arc::new(AdminPostingService::new(postings)),
        settings: Arc::new(AdminSettingsService::new(settings)),
        aifill: AiFillService::new(None),
        candidates: Arc::new(CandidateLedger::new()),
    })
}

fn encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| format!("{name}={}", value.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&")
}

fn form_post(uri: &str, cookie: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn login(router: &Router) -> String {
    let response = router
        .clone()
        .oneshot(form_post(
            "/login",
            None,
            encode(&[("password", PASSWORD)]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie");
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

async fn get_with_cookie(router: &Router, uri: &str, cookie: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn posting_form(title: &str, summary: &str) -> Vec<(&'static str, String)> {
    vec![
        ("form_id", "0f6f2f9a-0000-4000-8000-000000000001".to_string()),
        ("title", title.to_string()),
        ("department", "Railway Recruitment Board".to_string()),
        ("category", "Latest Jobs".to_string()),
        ("status", "published".to_string()),
        ("publish_at", String::new()),
        ("link", "https://rrb.gov.in/apply".to_string()),
        ("short_info", summary.to_string()),
    ]
}

fn encode_owned(pairs: &[(&'static str, String)]) -> String {
    let borrowed: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .collect();
    encode(&borrowed)
}

const LONG_SUMMARY: &str =
    "Applications are invited from eligible candidates for various posts; read the notification before applying.";

#[tokio::test]
async fn console_routes_require_a_session() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);

    for uri in ["/manage", "/postings/new", "/settings", "/candidates"] {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }
}

#[tokio::test]
async fn wrong_password_re_renders_the_login_page() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);

    let response = router
        .oneshot(form_post(
            "/login",
            None,
            encode(&[("password", "guess")]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8(body.to_vec())
        .unwrap()
        .contains("Incorrect password."));
}

#[tokio::test]
async fn login_grants_access_and_logout_revokes_it() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);

    let cookie = login(&router).await;
    let (status, body) = get_with_cookie(&router, "/manage", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Nothing here yet."));

    let response = router
        .clone()
        .oneshot(form_post("/logout", Some(&cookie), String::new()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/manage")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn created_posting_shows_up_on_the_manage_tab() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    let body = encode_owned(&posting_form("RRB Group D Online Form", LONG_SUMMARY));
    let response = router
        .clone()
        .oneshot(form_post("/postings/create", Some(&cookie), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/manage");

    let (status, body) = get_with_cookie(&router, "/manage", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("RRB Group D Online Form"));

    let postings: Arc<dyn PostingsStore> = store.clone();
    assert_eq!(postings.subscribe().borrow().len(), 1);
}

#[tokio::test]
async fn short_summary_bounces_until_confirmed() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    let form = posting_form("Terse Posting", "Apply now.");
    let response = router
        .clone()
        .oneshot(form_post(
            "/postings/create",
            Some(&cookie),
            encode_owned(&form),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("The description is quite short."));
    assert!(page.contains("confirm_short_summary"));

    let postings: Arc<dyn PostingsStore> = store.clone();
    assert!(postings.subscribe().borrow().is_empty());

    let mut confirmed = form;
    confirmed.push(("confirm_short_summary", "on".to_string()));
    let response = router
        .oneshot(form_post(
            "/postings/create",
            Some(&cookie),
            encode_owned(&confirmed),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(postings.subscribe().borrow().len(), 1);
}

#[tokio::test]
async fn unknown_category_label_is_rejected_with_the_form_intact() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    let mut form = posting_form("Odd Category", LONG_SUMMARY);
    form[3].1 = "Weekend Jobs".to_string();
    let response = router
        .oneshot(form_post(
            "/postings/create",
            Some(&cookie),
            encode_owned(&form),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("Unknown category"));
    assert!(page.contains("Odd Category"));
}

#[tokio::test]
async fn edit_and_delete_round_trip_through_the_console() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    let body = encode_owned(&posting_form("Initial Title", LONG_SUMMARY));
    router
        .clone()
        .oneshot(form_post("/postings/create", Some(&cookie), body))
        .await
        .unwrap();
    let postings: Arc<dyn PostingsStore> = store.clone();
    let id = postings.subscribe().borrow()[0].id;

    let (status, body) = get_with_cookie(&router, &format!("/postings/{id}/edit"), &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Initial Title"));

    let mut form = posting_form("Corrected Title", LONG_SUMMARY);
    form.push(("id", id.to_string()));
    let response = router
        .clone()
        .oneshot(form_post(
            &format!("/postings/{id}/edit"),
            Some(&cookie),
            encode_owned(&form),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(postings.subscribe().borrow()[0].title, "Corrected Title");

    let response = router
        .oneshot(form_post(
            &format!("/postings/{id}/delete"),
            Some(&cookie),
            String::new(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(postings.subscribe().borrow().is_empty());
}

#[tokio::test]
async fn editing_an_unknown_posting_returns_to_manage() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/postings/00000000-0000-0000-0000-000000000000/edit")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/manage");
}

#[tokio::test]
async fn ai_buttons_report_when_no_key_is_configured() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    let body = encode_owned(&posting_form("SSC MTS 2026", LONG_SUMMARY));
    let response = router
        .oneshot(form_post("/postings/ai/title", Some(&cookie), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8(body.to_vec())
        .unwrap()
        .contains("AI assistance is not configured."));
}

#[tokio::test]
async fn ai_link_sync_reads_the_apply_link() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    // A filled notification link does not count; the sync reads the apply link.
    let mut form = posting_form("KVS Teacher Vacancy", LONG_SUMMARY);
    form[6].1 = String::new();
    form.push(("notification_link", "https://kvs.gov.in/notice.pdf".to_string()));
    let response = router
        .clone()
        .oneshot(form_post(
            "/postings/ai/link",
            Some(&cookie),
            encode_owned(&form),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8(body.to_vec())
        .unwrap()
        .contains("Paste a link first."));

    // With the apply link present the request reaches the AI layer.
    let body = encode_owned(&posting_form("KVS Teacher Vacancy", LONG_SUMMARY));
    let response = router
        .oneshot(form_post("/postings/ai/link", Some(&cookie), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8(body.to_vec())
        .unwrap()
        .contains("AI assistance is not configured."));
}

#[tokio::test]
async fn scheduled_tab_shows_the_publish_instant() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    let mut form = posting_form("DSSSB PGT Recruitment", LONG_SUMMARY);
    form[4].1 = "scheduled".to_string();
    form[5].1 = "2027-03-01T09:30".to_string();
    let response = router
        .clone()
        .oneshot(form_post(
            "/postings/create",
            Some(&cookie),
            encode_owned(&form),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (status, body) = get_with_cookie(&router, "/manage?status=scheduled", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Scheduled For"));
    assert!(body.contains("1 March 2027, 09:30 UTC"));
    assert!(body.contains("DSSSB PGT Recruitment"));

    // The scheduled record never leaks onto the published tab.
    let (_, body) = get_with_cookie(&router, "/manage", &cookie).await;
    assert!(!body.contains("DSSSB PGT Recruitment"));
}

#[tokio::test]
async fn settings_update_persists_and_rejects_bad_links() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    let (status, body) = get_with_cookie(&router, "/settings", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("SARKARI RESULT LIVE"));

    let valid = encode(&[
        ("site_name", "ROZGAR LIVE"),
        ("footer_text", "WWW.ROZGAR.LIVE"),
        ("telegram_link", "https://t.me/rozgarlive"),
        ("whatsapp_link", ""),
        ("publisher_id", "pub-1234"),
        ("ad_slot_top", ""),
        ("ad_slot_side", ""),
        ("ad_slot_bottom", ""),
    ]);
    let response = router
        .clone()
        .oneshot(form_post("/settings", Some(&cookie), valid))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8(body.to_vec())
        .unwrap()
        .contains("Settings saved."));

    let settings: Arc<dyn SettingsStore> = store.clone();
    assert_eq!(settings.ensure_settings().await.unwrap().site_name, "ROZGAR LIVE");

    let invalid = encode(&[
        ("site_name", "ROZGAR LIVE"),
        ("footer_text", "WWW.ROZGAR.LIVE"),
        ("telegram_link", "not-a-url"),
        ("whatsapp_link", ""),
        ("publisher_id", ""),
        ("ad_slot_top", ""),
        ("ad_slot_side", ""),
        ("ad_slot_bottom", ""),
    ]);
    let response = router
        .oneshot(form_post("/settings", Some(&cookie), invalid))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn candidates_are_staged_and_cleared() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    let response = router
        .clone()
        .oneshot(form_post(
            "/candidates",
            Some(&cookie),
            encode(&[
                ("title", "UP Police Constable Recruitment"),
                ("source_url", "https://uppbpb.gov.in/notice"),
            ]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/candidates");

    let (status, body) = get_with_cookie(&router, "/candidates", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("UP Police Constable Recruitment"));

    let response = router
        .clone()
        .oneshot(form_post("/candidates/clear", Some(&cookie), String::new()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (status, body) = get_with_cookie(&router, "/candidates", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No staged candidates."));
}

#[tokio::test]
async fn candidate_entry_requires_both_fields() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    let response = router
        .oneshot(form_post(
            "/candidates",
            Some(&cookie),
            encode(&[("title", "Only a title"), ("source_url", "")]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8(body.to_vec())
        .unwrap()
        .contains("Both a title and a source URL are required."));
}

#[tokio::test]
async fn promoting_without_an_ai_key_still_opens_the_editor() {
    let store = Arc::new(MemoryStore::new());
    let router = console(&store);
    let cookie = login(&router).await;

    router
        .clone()
        .oneshot(form_post(
            "/candidates",
            Some(&cookie),
            encode(&[
                ("title", "Bihar Police SI Vacancy"),
                ("source_url", "https://bpssc.bih.nic.in/notice"),
            ]),
        ))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(form_post(
            "/candidates/0/promote",
            Some(&cookie),
            String::new(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("Bihar Police SI Vacancy"));
    assert!(page.contains("AI sync failed"));

    // Promotion consumes the staged entry either way.
    let (_, body) = get_with_cookie(&router, "/candidates", &cookie).await;
    assert!(body.contains("No staged candidates."));
}
