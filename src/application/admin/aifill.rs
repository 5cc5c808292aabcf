//! AI content-fill orchestration for the posting editor.
//!
//! Wraps the generative client with per-form single-flight: while one
//! request for a form is in flight, further requests for the same form
//! are rejected with [`AiFillError::Busy`] instead of queued.

use std::sync::Arc;

use dashmap::DashSet;
use thiserror::Error;
use uuid::Uuid;

use crate::infra::ai::{AiError, AiPostingFill, GenAiClient};

#[derive(Debug, Error)]
pub enum AiFillError {
    #[error("a fill request for this form is already in flight")]
    Busy,
    #[error("no AI API key configured")]
    NotConfigured,
    #[error(transparent)]
    Ai(#[from] AiError),
}

#[derive(Clone, Default)]
pub struct AiFillService {
    client: Option<Arc<GenAiClient>>,
    in_flight: Arc<DashSet<Uuid>>,
}

impl AiFillService {
    pub fn new(client: Option<GenAiClient>) -> Self {
        Self {
            client: client.map(Arc::new),
            in_flight: Arc::new(DashSet::new()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn generate_from_title(
        &self,
        form: Uuid,
        title: &str,
    ) -> Result<AiPostingFill, AiFillError> {
        let client = self.client()?;
        let _slot = self.acquire(form)?;
        Ok(client.generate_from_title(title).await?)
    }

    pub async fn sync_from_link(
        &self,
        form: Uuid,
        url: &str,
    ) -> Result<AiPostingFill, AiFillError> {
        let client = self.client()?;
        let _slot = self.acquire(form)?;
        Ok(client.sync_from_link(url).await?)
    }

    pub async fn generate_description(
        &self,
        form: Uuid,
        title: &str,
        department: &str,
    ) -> Result<String, AiFillError> {
        let client = self.client()?;
        let _slot = self.acquire(form)?;
        Ok(client.generate_description(title, department).await?)
    }

    fn client(&self) -> Result<&GenAiClient, AiFillError> {
        self.client.as_deref().ok_or(AiFillError::NotConfigured)
    }

    fn acquire(&self, form: Uuid) -> Result<InFlightSlot<'_>, AiFillError> {
        if !self.in_flight.insert(form) {
            return Err(AiFillError::Busy);
        }
        Ok(InFlightSlot {
            set: &self.in_flight,
            form,
        })
    }
}

struct InFlightSlot<'a> {
    set: &'a DashSet<Uuid>,
    form: Uuid,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.form);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_service_reports_not_configured() {
        let service = AiFillService::new(None);
        assert!(!service.is_configured());
        let err = service
            .generate_from_title(Uuid::new_v4(), "SSC CGL 2025")
            .await
            .unwrap_err();
        assert!(matches!(err, AiFillError::NotConfigured));
    }

    #[test]
    fn second_acquire_for_same_form_is_busy() {
        let service = AiFillService {
            client: None,
            in_flight: Arc::new(DashSet::new()),
        };
        let form = Uuid::new_v4();
        let slot = service.acquire(form).expect("first acquire");
        assert!(matches!(service.acquire(form), Err(AiFillError::Busy)));
        // Distinct forms are independent.
        let other = service.acquire(Uuid::new_v4()).expect("other form");
        drop(other);
        drop(slot);
        assert!(service.acquire(form).is_ok());
    }
}
