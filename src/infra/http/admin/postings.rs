//! Manage and editor handlers for the posting collection.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::application::admin::aifill::AiFillError;
use crate::application::admin::postings::{AdminPostingError, SubmitPostingCommand};
use crate::domain::types::{Category, PostingStatus};
use crate::infra::ai::AiPostingFill;
use crate::infra::http::store_error_to_http;
use crate::presentation::admin::views::{
    DATETIME_LOCAL_FORMAT, EditorForm, EditorTemplate, ManageTemplate,
};
use crate::presentation::views::render_template_response;

use super::AdminState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManageQuery {
    status: Option<String>,
}

pub async fn manage(State(state): State<AdminState>, Query(query): Query<ManageQuery>) -> Response {
    let status = match query.status.as_deref() {
        Some("draft") => PostingStatus::Draft,
        Some("scheduled") => PostingStatus::Scheduled,
        _ => PostingStatus::Published,
    };
    let template = ManageTemplate::new(status, state.postings.list(status));
    render_template_response(template, StatusCode::OK)
}

pub async fn editor_new(State(state): State<AdminState>) -> Response {
    let template = EditorTemplate::new(EditorForm::blank(), state.aifill.is_configured());
    render_template_response(template, StatusCode::OK)
}

pub async fn editor_edit(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    match state.postings.find(id) {
        Some(record) => {
            let template =
                EditorTemplate::new(EditorForm::from_record(&record), state.aifill.is_configured());
            render_template_response(template, StatusCode::OK)
        }
        None => Redirect::to("/manage").into_response(),
    }
}

/// Raw form image as posted by the editor. Everything is a string so a
/// rejected submission re-renders verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostingForm {
    form_id: String,
    id: String,
    title: String,
    department: String,
    category: String,
    status: String,
    publish_at: String,
    link: String,
    notification_link: String,
    official_website: String,
    short_info: String,
    important_dates: String,
    fee: String,
    age_limit: String,
    total_posts: String,
    vacancy_details: String,
    eligibility: String,
    how_to_apply: String,
    selection_process: String,
    confirm_short_summary: Option<String>,
}

impl PostingForm {
    fn form_uuid(&self) -> Uuid {
        self.form_id.parse().unwrap_or_else(|_| Uuid::new_v4())
    }

    fn record_id(&self) -> Option<Uuid> {
        self.id.parse().ok()
    }

    fn to_editor(&self) -> EditorForm {
        EditorForm {
            form_id: self.form_uuid(),
            id: self.record_id(),
            title: self.title.clone(),
            department: self.department.clone(),
            category: self.category.clone(),
            status: self.status.clone(),
            publish_at: self.publish_at.clone(),
            link: self.link.clone(),
            notification_link: self.notification_link.clone(),
            official_website: self.official_website.clone(),
            short_info: self.short_info.clone(),
            important_dates: self.important_dates.clone(),
            fee: self.fee.clone(),
            age_limit: self.age_limit.clone(),
            total_posts: self.total_posts.clone(),
            vacancy_details: self.vacancy_details.clone(),
            eligibility: self.eligibility.clone(),
            how_to_apply: self.how_to_apply.clone(),
            selection_process: self.selection_process.clone(),
        }
    }

    fn to_command(&self) -> Result<SubmitPostingCommand, String> {
        let category = Category::from_label(self.category.trim())
            .ok_or_else(|| format!("Unknown category: {}", self.category))?;
        let status = match self.status.trim() {
            "draft" => PostingStatus::Draft,
            "scheduled" => PostingStatus::Scheduled,
            "published" => PostingStatus::Published,
            other => return Err(format!("Unknown status: {other}")),
        };
        let publish_at = match self.publish_at.trim() {
            "" => None,
            value => Some(
                PrimitiveDateTime::parse(value, DATETIME_LOCAL_FORMAT)
                    .map_err(|_| "Invalid publish timestamp".to_string())?
                    .assume_utc(),
            ),
        };

        Ok(SubmitPostingCommand {
            title: self.title.trim().to_string(),
            department: self.department.trim().to_string(),
            category,
            status,
            publish_at,
            link: self.link.trim().to_string(),
            notification_link: opt(&self.notification_link),
            official_website: opt(&self.official_website),
            short_info: opt(&self.short_info),
            important_dates: opt(&self.important_dates),
            fee: opt(&self.fee),
            age_limit: opt(&self.age_limit),
            total_posts: opt(&self.total_posts),
            vacancy_details: opt(&self.vacancy_details),
            eligibility: opt(&self.eligibility),
            how_to_apply: opt(&self.how_to_apply),
            selection_process: opt(&self.selection_process),
            confirm_short_summary: self.confirm_short_summary.is_some(),
        })
    }
}

fn opt(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub async fn create(State(state): State<AdminState>, Form(form): Form<PostingForm>) -> Response {
    let command = match form.to_command() {
        Ok(command) => command,
        Err(message) => return rejected(&state, &form, message),
    };
    match state.postings.create(command).await {
        Ok(_) => Redirect::to("/manage").into_response(),
        Err(err) => submit_error(&state, &form, err),
    }
}

pub async fn update(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Form(form): Form<PostingForm>,
) -> Response {
    let command = match form.to_command() {
        Ok(command) => command,
        Err(message) => return rejected(&state, &form, message),
    };
    match state.postings.update(id, command).await {
        Ok(()) => Redirect::to("/manage").into_response(),
        Err(err) => submit_error(&state, &form, err),
    }
}

pub async fn delete(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    match state.postings.delete(id).await {
        Ok(()) => Redirect::to("/manage").into_response(),
        Err(AdminPostingError::Store(err)) => {
            store_error_to_http("infra::http::admin::postings::delete", err).into_response()
        }
        Err(_) => Redirect::to("/manage").into_response(),
    }
}

fn submit_error(state: &AdminState, form: &PostingForm, err: AdminPostingError) -> Response {
    match err {
        AdminPostingError::ShortSummary => {
            let mut template = EditorTemplate::new(form.to_editor(), state.aifill.is_configured());
            template.ask_short_summary = true;
            template.error = Some(
                "The description is quite short. Confirm to save it as-is, or let AI expand it."
                    .to_string(),
            );
            render_template_response(template, StatusCode::OK)
        }
        AdminPostingError::ConstraintViolation(field) => {
            rejected(state, form, format!("Missing or invalid field: {field}"))
        }
        AdminPostingError::Store(err) => {
            store_error_to_http("infra::http::admin::postings::submit", err).into_response()
        }
    }
}

fn rejected(state: &AdminState, form: &PostingForm, message: String) -> Response {
    let mut template = EditorTemplate::new(form.to_editor(), state.aifill.is_configured());
    template.error = Some(message);
    render_template_response(template, StatusCode::BAD_REQUEST)
}

pub async fn ai_from_title(
    State(state): State<AdminState>,
    Form(form): Form<PostingForm>,
) -> Response {
    if form.title.trim().is_empty() {
        return rejected(&state, &form, "Enter a title first.".to_string());
    }
    match state
        .aifill
        .generate_from_title(form.form_uuid(), form.title.trim())
        .await
    {
        Ok(fill) => filled(&state, &form, fill),
        Err(err) => rejected(&state, &form, ai_error_message(err)),
    }
}

pub async fn ai_from_link(
    State(state): State<AdminState>,
    Form(form): Form<PostingForm>,
) -> Response {
    let link = form.link.trim();
    if link.is_empty() {
        return rejected(&state, &form, "Paste a link first.".to_string());
    }
    match state.aifill.sync_from_link(form.form_uuid(), link).await {
        Ok(fill) => filled(&state, &form, fill),
        Err(err) => rejected(&state, &form, ai_error_message(err)),
    }
}

pub async fn ai_description(
    State(state): State<AdminState>,
    Form(form): Form<PostingForm>,
) -> Response {
    if form.title.trim().is_empty() || form.department.trim().is_empty() {
        return rejected(
            &state,
            &form,
            "Title and department are required for a description.".to_string(),
        );
    }
    match state
        .aifill
        .generate_description(form.form_uuid(), form.title.trim(), form.department.trim())
        .await
    {
        Ok(text) => {
            let mut editor = form.to_editor();
            editor.short_info = text;
            render_template_response(
                EditorTemplate::new(editor, state.aifill.is_configured()),
                StatusCode::OK,
            )
        }
        Err(err) => rejected(&state, &form, ai_error_message(err)),
    }
}

/// Merge an AI fill over the posted form. Model output wins field by field;
/// empty model fields leave the operator's text alone.
fn filled(state: &AdminState, form: &PostingForm, fill: AiPostingFill) -> Response {
    let mut editor = form.to_editor();
    let assign = |target: &mut String, value: Option<String>| {
        if let Some(value) = value {
            if !value.trim().is_empty() {
                *target = value;
            }
        }
    };
    assign(&mut editor.title, fill.title);
    assign(&mut editor.department, fill.department);
    assign(&mut editor.short_info, fill.short_info);
    assign(&mut editor.important_dates, fill.important_dates);
    assign(&mut editor.fee, fill.fee);
    assign(&mut editor.age_limit, fill.age_limit);
    assign(&mut editor.total_posts, fill.total_posts);
    assign(&mut editor.vacancy_details, fill.vacancy_details);
    assign(&mut editor.eligibility, fill.eligibility);
    assign(&mut editor.how_to_apply, fill.how_to_apply);
    assign(&mut editor.selection_process, fill.selection_process);
    assign(&mut editor.official_website, fill.official_website);
    if let Some(label) = fill.category {
        if Category::from_label(label.trim()).is_some() {
            editor.category = label.trim().to_string();
        }
    }
    render_template_response(
        EditorTemplate::new(editor, state.aifill.is_configured()),
        StatusCode::OK,
    )
}

fn ai_error_message(err: AiFillError) -> String {
    match err {
        AiFillError::Busy => "An AI request for this form is already running.".to_string(),
        AiFillError::NotConfigured => "AI assistance is not configured.".to_string(),
        AiFillError::Ai(err) => format!("AI request failed: {err}"),
    }
}
