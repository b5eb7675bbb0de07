//! API handler modules

use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};
use tracing::error;

use super::errors::ApiError;

pub mod submit_form;
pub mod welcome;

/// Catch panics and return a 500 error
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };

    error!(error = %details, "unhandled error");

    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        .with_error(details)
        .into_response()
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::new_404("Not found")
}
