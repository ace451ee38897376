use std::any::Any;

use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};
use common::config::AppEnvironment;

use crate::error::ApiError;

/// Any path no route matched
pub async fn route_not_found(uri: Uri) -> ApiError {
    tracing::debug!(path = %uri.path(), "No route matched");
    ApiError::RouteNotFound
}

/// Final error stage: a panicking handler still answers with an envelope.
/// The panic message is echoed outside production.
pub fn panic_handler(
    environment: AppEnvironment,
) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone {
    move |panic| handle_panic(panic, environment)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>, environment: AppEnvironment) -> Response {
    let reason = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(reason, "Handler panicked");

    ApiError::Internal {
        message: "An internal server error occurred".to_string(),
        detail: environment
            .exposes_error_details()
            .then(|| reason.to_string()),
    }
    .into_response()
}
