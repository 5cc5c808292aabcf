mod auth;
mod candidates;
mod postings;
mod settings;

use std::sync::Arc;

use axum::{
    Router,
    middleware,
    response::Redirect,
    routing::{get, post},
};

use crate::application::admin::aifill::AiFillService;
use crate::application::admin::auth::AdminAuthService;
use crate::application::admin::candidates::CandidateLedger;
use crate::application::admin::postings::AdminPostingService;
use crate::application::admin::settings::AdminSettingsService;
use crate::infra::assets;

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct AdminState {
    pub auth: Arc<AdminAuthService>,
    pub postings: Arc<AdminPostingService>,
    pub settings: Arc<AdminSettingsService>,
    pub aifill: AiFillService,
    pub candidates: Arc<CandidateLedger>,
}

pub fn build_admin_router(state: AdminState) -> Router {
    let open = Router::new()
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/static/{*path}", get(assets::serve));

    let protected = Router::new()
        .route("/", get(root_redirect))
        .route("/logout", post(auth::logout))
        .route("/manage", get(postings::manage))
        .route("/postings/new", get(postings::editor_new))
        .route("/postings/create", post(postings::create))
        .route(
            "/postings/{id}/edit",
            get(postings::editor_edit).post(postings::update),
        )
        .route("/postings/{id}/delete", post(postings::delete))
        .route("/postings/ai/title", post(postings::ai_from_title))
        .route("/postings/ai/link", post(postings::ai_from_link))
        .route("/postings/ai/description", post(postings::ai_description))
        .route(
            "/settings",
            get(settings::settings_page).post(settings::settings_update),
        )
        .route("/candidates", get(candidates::list).post(candidates::add))
        .route("/candidates/{index}/promote", post(candidates::promote))
        .route("/candidates/clear", post(candidates::clear))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    open.merge(protected)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn root_redirect() -> Redirect {
    Redirect::to("/manage")
}
