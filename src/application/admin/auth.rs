//! Console login gate.
//!
//! A single shared static secret compared in constant time, minting
//! in-memory session tokens. Deliberately not a security boundary: no
//! hashing, no rate limiting, no persistence across restarts.

use dashmap::DashMap;
use subtle::ConstantTimeEq;
use time::OffsetDateTime;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "rozgar_admin_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self)
    }
}

pub struct AdminAuthService {
    password: String,
    sessions: DashMap<Uuid, OffsetDateTime>,
}

impl AdminAuthService {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            sessions: DashMap::new(),
        }
    }

    /// Verbatim comparison of the shared secret; a match mints a session.
    pub fn login(&self, password: &str) -> Option<SessionToken> {
        let expected = self.password.as_bytes();
        let supplied = password.as_bytes();
        let matches =
            expected.len() == supplied.len() && bool::from(expected.ct_eq(supplied));
        if !matches {
            return None;
        }
        let token = SessionToken(Uuid::new_v4());
        self.sessions.insert(token.0, OffsetDateTime::now_utc());
        Some(token)
    }

    pub fn is_authenticated(&self, token: SessionToken) -> bool {
        self.sessions.contains_key(&token.0)
    }

    pub fn logout(&self, token: SessionToken) {
        self.sessions.remove(&token.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_mints_a_session() {
        let auth = AdminAuthService::new("admin123");
        let token = auth.login("admin123").expect("session");
        assert!(auth.is_authenticated(token));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let auth = AdminAuthService::new("admin123");
        assert!(auth.login("admin12").is_none());
        assert!(auth.login("ADMIN123").is_none());
        assert!(auth.login("").is_none());
    }

    #[test]
    fn logout_revokes_the_session() {
        let auth = AdminAuthService::new("secret");
        let token = auth.login("secret").expect("session");
        auth.logout(token);
        assert!(!auth.is_authenticated(token));
    }
}
