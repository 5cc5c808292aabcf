//! Discovered-candidate staging handlers.
//!
//! Candidates are manually pasted title/URL pairs. Promoting one runs the
//! AI link-sync and lands in the editor with the extracted fields
//! prefilled; the record is only created when the operator saves.

use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::admin::auth::SessionToken;
use crate::domain::entities::DiscoveredCandidate;
use crate::presentation::admin::views::{CandidatesTemplate, EditorForm, EditorTemplate};
use crate::presentation::views::render_template_response;

use super::AdminState;
use super::auth::session_from_headers;

fn session(headers: &HeaderMap) -> Option<SessionToken> {
    session_from_headers(headers)
}

pub async fn list(State(state): State<AdminState>, headers: HeaderMap) -> Response {
    let Some(token) = session(&headers) else {
        return Redirect::to("/login").into_response();
    };
    render_template_response(
        CandidatesTemplate {
            candidates: state.candidates.list(token),
            error: None,
        },
        StatusCode::OK,
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CandidateForm {
    title: String,
    source_url: String,
}

pub async fn add(
    State(state): State<AdminState>,
    headers: HeaderMap,
    Form(form): Form<CandidateForm>,
) -> Response {
    let Some(token) = session(&headers) else {
        return Redirect::to("/login").into_response();
    };
    if form.title.trim().is_empty() || form.source_url.trim().is_empty() {
        return render_template_response(
            CandidatesTemplate {
                candidates: state.candidates.list(token),
                error: Some("Both a title and a source URL are required.".to_string()),
            },
            StatusCode::BAD_REQUEST,
        );
    }
    state.candidates.add(
        token,
        DiscoveredCandidate {
            title: form.title.trim().to_string(),
            source_url: form.source_url.trim().to_string(),
        },
    );
    Redirect::to("/candidates").into_response()
}

pub async fn promote(
    State(state): State<AdminState>,
    headers: HeaderMap,
    Path(index): Path<usize>,
) -> Response {
    let Some(token) = session(&headers) else {
        return Redirect::to("/login").into_response();
    };
    let Some(candidate) = state.candidates.take(token, index) else {
        return Redirect::to("/candidates").into_response();
    };

    let mut editor = EditorForm::blank();
    editor.title = candidate.title.clone();
    // The source URL lands in the apply-link field, the same one the
    // editor's own sync button reads.
    editor.link = candidate.source_url.clone();

    match state
        .aifill
        .sync_from_link(Uuid::new_v4(), &candidate.source_url)
        .await
    {
        Ok(fill) => {
            if let Some(title) = fill.title.filter(|t| !t.trim().is_empty()) {
                editor.title = title;
            }
            editor.department = fill.department.unwrap_or_default();
            editor.short_info = fill.short_info.unwrap_or_default();
            editor.important_dates = fill.important_dates.unwrap_or_default();
            editor.fee = fill.fee.unwrap_or_default();
            editor.age_limit = fill.age_limit.unwrap_or_default();
            editor.total_posts = fill.total_posts.unwrap_or_default();
            editor.vacancy_details = fill.vacancy_details.unwrap_or_default();
            editor.eligibility = fill.eligibility.unwrap_or_default();
            editor.how_to_apply = fill.how_to_apply.unwrap_or_default();
            editor.selection_process = fill.selection_process.unwrap_or_default();
            editor.official_website = fill.official_website.unwrap_or_default();
            if let Some(label) = fill.category {
                if crate::domain::types::Category::from_label(label.trim()).is_some() {
                    editor.category = label.trim().to_string();
                }
            }
            render_template_response(
                EditorTemplate::new(editor, state.aifill.is_configured()),
                StatusCode::OK,
            )
        }
        // The candidate was already consumed; hand the operator a bare
        // editor rather than dropping their pick on the floor.
        Err(err) => {
            let mut template = EditorTemplate::new(editor, state.aifill.is_configured());
            template.error = Some(format!("AI sync failed: {err}"));
            render_template_response(template, StatusCode::OK)
        }
    }
}

pub async fn clear(State(state): State<AdminState>, headers: HeaderMap) -> Response {
    if let Some(token) = session(&headers) {
        state.candidates.clear(token);
    }
    Redirect::to("/candidates").into_response()
}
