//! Infrastructure adapters and runtime bootstrap.

pub mod ai;
pub mod assets;
pub mod error;
pub mod http;
pub mod last_seen;
pub mod store;
pub mod telemetry;
