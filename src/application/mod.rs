//! Application services layer.

pub mod admin;
pub mod error;
pub mod feed;
pub mod notify;
pub mod store;
pub mod sweep;
