//! Per-session staging list of discovered candidates.
//!
//! Candidates are title + source URL pairs awaiting promotion into a
//! posting via the AI link-sync path. They live only in admin-session
//! memory and vanish with the session.

use dashmap::DashMap;
use uuid::Uuid;

use crate::application::admin::auth::SessionToken;
use crate::domain::entities::DiscoveredCandidate;

#[derive(Default)]
pub struct CandidateLedger {
    sessions: DashMap<Uuid, Vec<DiscoveredCandidate>>,
}

impl CandidateLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, session: SessionToken, candidate: DiscoveredCandidate) {
        self.sessions
            .entry(session.as_uuid())
            .or_default()
            .push(candidate);
    }

    pub fn list(&self, session: SessionToken) -> Vec<DiscoveredCandidate> {
        self.sessions
            .get(&session.as_uuid())
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Remove and return the candidate at `index`, if present.
    pub fn take(&self, session: SessionToken, index: usize) -> Option<DiscoveredCandidate> {
        let mut entry = self.sessions.get_mut(&session.as_uuid())?;
        if index >= entry.len() {
            return None;
        }
        Some(entry.remove(index))
    }

    pub fn clear(&self, session: SessionToken) {
        self.sessions.remove(&session.as_uuid());
    }
}
