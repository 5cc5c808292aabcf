//! Admin-side application services.

pub mod aifill;
pub mod auth;
pub mod candidates;
pub mod postings;
pub mod settings;
