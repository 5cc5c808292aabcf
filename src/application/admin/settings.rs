//! Site-settings commands for the admin console.

use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::application::store::{SettingsStore, StoreError};
use crate::domain::entities::SiteSettingsRecord;

#[derive(Debug, Error)]
pub enum AdminSettingsError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct UpdateSettingsCommand {
    pub site_name: String,
    pub footer_text: String,
    pub telegram_link: String,
    pub whatsapp_link: String,
    pub publisher_id: String,
    pub ad_slot_top: String,
    pub ad_slot_side: String,
    pub ad_slot_bottom: String,
}

#[derive(Clone)]
pub struct AdminSettingsService {
    store: Arc<dyn SettingsStore>,
}

impl AdminSettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<SiteSettingsRecord, AdminSettingsError> {
        Ok(self.store.ensure_settings().await?)
    }

    pub async fn update(
        &self,
        command: UpdateSettingsCommand,
    ) -> Result<SiteSettingsRecord, AdminSettingsError> {
        ensure_non_empty(&command.site_name, "site_name")?;
        ensure_non_empty(&command.footer_text, "footer_text")?;
        ensure_url_or_empty(&command.telegram_link, "telegram_link")?;
        ensure_url_or_empty(&command.whatsapp_link, "whatsapp_link")?;

        let record = SiteSettingsRecord {
            site_name: command.site_name,
            footer_text: command.footer_text,
            telegram_link: command.telegram_link,
            whatsapp_link: command.whatsapp_link,
            publisher_id: command.publisher_id,
            ad_slot_top: command.ad_slot_top,
            ad_slot_side: command.ad_slot_side,
            ad_slot_bottom: command.ad_slot_bottom,
        };
        self.store.write_settings(record.clone()).await?;
        Ok(record)
    }
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), AdminSettingsError> {
    if value.trim().is_empty() {
        return Err(AdminSettingsError::ConstraintViolation(field));
    }
    Ok(())
}

fn ensure_url_or_empty(value: &str, field: &'static str) -> Result<(), AdminSettingsError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    Url::parse(value).map_err(|_| AdminSettingsError::ConstraintViolation(field))?;
    Ok(())
}
