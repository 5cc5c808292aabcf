pub mod admin;
mod middleware;
mod public;

pub use admin::{AdminState, build_admin_router};
pub use public::{PublicState, build_public_router};

use axum::http::StatusCode;

use crate::application::error::HttpError;
use crate::application::store::StoreError;

/// Map a store error to a consistent HTTP error response for either surface.
pub fn store_error_to_http(source: &'static str, err: StoreError) -> HttpError {
    match err {
        StoreError::Unreachable(message) => HttpError::new(
            source,
            StatusCode::SERVICE_UNAVAILABLE,
            "Store unreachable",
            message,
        ),
        StoreError::Persistence(message) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Persistence error",
            message,
        ),
    }
}
