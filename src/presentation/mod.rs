//! Template rendering and view models.

pub mod admin;
pub mod views;
