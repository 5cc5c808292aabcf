//! Session cookie plumbing for the admin surface.

use axum::{
    Form,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::application::admin::auth::{SESSION_COOKIE, SessionToken};
use crate::presentation::admin::views::LoginTemplate;
use crate::presentation::views::render_template_response;

use super::AdminState;

pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name != SESSION_COOKIE {
            return None;
        }
        value.parse().ok()
    })
}

fn session_cookie(value: &str, max_age: Option<u64>) -> HeaderValue {
    let cookie = match max_age {
        Some(seconds) => {
            format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={seconds}")
        }
        None => format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax"),
    };
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Gate for every console route except login and static assets.
pub async fn require_session(
    State(state): State<AdminState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match session_from_headers(request.headers()) {
        Some(token) if state.auth.is_authenticated(token) => next.run(request).await,
        _ => Redirect::to("/login").into_response(),
    }
}

pub async fn login_page() -> Response {
    render_template_response(LoginTemplate { error: None }, StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    password: String,
}

pub async fn login_submit(
    State(state): State<AdminState>,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth.login(&form.password) {
        Some(token) => {
            info!(target = "rozgar::admin", session = %token, "console session opened");
            let mut response = Redirect::to("/manage").into_response();
            response
                .headers_mut()
                .insert(header::SET_COOKIE, session_cookie(&token.to_string(), None));
            response
        }
        None => render_template_response(
            LoginTemplate {
                error: Some("Incorrect password.".to_string()),
            },
            StatusCode::UNAUTHORIZED,
        ),
    }
}

pub async fn logout(State(state): State<AdminState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_from_headers(&headers) {
        state.auth.logout(token);
        state.candidates.clear(token);
        info!(target = "rozgar::admin", session = %token, "console session closed");
    }
    let mut response = Redirect::to("/login").into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, session_cookie("", Some(0)));
    response
}
