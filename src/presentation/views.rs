use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::{ErrorReport, HttpError};
use crate::application::feed::{CategoryFeed, DetailFeed, HomeFeed, PostingSummary};
use crate::domain::entities::SiteSettingsRecord;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(settings: SiteSettingsRecord) -> Response {
    let mut response = render_template_response(
        ErrorTemplate {
            settings,
            heading: "404",
            message: "The page you are looking for does not exist.",
        },
        StatusCode::NOT_FOUND,
    );
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Indefinite holding page shown until the settings document has arrived.
pub fn render_connecting_response() -> Response {
    render_template_response(ConnectingTemplate, StatusCode::OK)
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub view: HomeFeed,
}

#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryTemplate {
    pub view: CategoryFeed,
}

#[derive(Template)]
#[template(path = "posting.html")]
pub struct PostingTemplate {
    pub view: DetailFeed,
}

#[derive(Template)]
#[template(path = "connecting.html")]
pub struct ConnectingTemplate;

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub settings: SiteSettingsRecord,
    pub heading: &'static str,
    pub message: &'static str,
}

#[derive(Template)]
#[template(path = "partials/ticker.html")]
pub struct TickerPartial {
    pub items: Vec<PostingSummary>,
}

#[derive(Template)]
#[template(path = "partials/breaking.html")]
pub struct BreakingPartial {
    pub items: Vec<PostingSummary>,
}
