//! Site-settings handlers.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::application::admin::settings::{AdminSettingsError, UpdateSettingsCommand};
use crate::infra::http::store_error_to_http;
use crate::presentation::admin::views::SettingsTemplate;
use crate::presentation::views::render_template_response;

use super::AdminState;

pub async fn settings_page(State(state): State<AdminState>) -> Response {
    match state.settings.load().await {
        Ok(form) => render_template_response(
            SettingsTemplate {
                form,
                saved: false,
                error: None,
            },
            StatusCode::OK,
        ),
        Err(AdminSettingsError::Store(err)) => {
            store_error_to_http("infra::http::admin::settings::settings_page", err)
                .into_response()
        }
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("settings unavailable: {err}"),
        )
            .into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    site_name: String,
    footer_text: String,
    telegram_link: String,
    whatsapp_link: String,
    publisher_id: String,
    ad_slot_top: String,
    ad_slot_side: String,
    ad_slot_bottom: String,
}

pub async fn settings_update(
    State(state): State<AdminState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let command = UpdateSettingsCommand {
        site_name: form.site_name.trim().to_string(),
        footer_text: form.footer_text.trim().to_string(),
        telegram_link: form.telegram_link.trim().to_string(),
        whatsapp_link: form.whatsapp_link.trim().to_string(),
        publisher_id: form.publisher_id.trim().to_string(),
        ad_slot_top: form.ad_slot_top.trim().to_string(),
        ad_slot_side: form.ad_slot_side.trim().to_string(),
        ad_slot_bottom: form.ad_slot_bottom.trim().to_string(),
    };

    match state.settings.update(command).await {
        Ok(saved) => render_template_response(
            SettingsTemplate {
                form: saved,
                saved: true,
                error: None,
            },
            StatusCode::OK,
        ),
        Err(AdminSettingsError::ConstraintViolation(field)) => {
            // Re-render with the rejected values so nothing typed is lost.
            let rejected = crate::domain::entities::SiteSettingsRecord {
                site_name: form.site_name,
                footer_text: form.footer_text,
                telegram_link: form.telegram_link,
                whatsapp_link: form.whatsapp_link,
                publisher_id: form.publisher_id,
                ad_slot_top: form.ad_slot_top,
                ad_slot_side: form.ad_slot_side,
                ad_slot_bottom: form.ad_slot_bottom,
            };
            render_template_response(
                SettingsTemplate {
                    form: rejected,
                    saved: false,
                    error: Some(format!("Missing or invalid field: {field}")),
                },
                StatusCode::BAD_REQUEST,
            )
        }
        Err(AdminSettingsError::Store(err)) => {
            store_error_to_http("infra::http::admin::settings::settings_update", err)
                .into_response()
        }
    }
}
