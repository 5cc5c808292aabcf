//! Domain layer types and invariants.

pub mod entities;
pub mod postings;
pub mod types;
