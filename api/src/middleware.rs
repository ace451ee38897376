use axum::{extract::Request, middleware::Next, response::Response};
use common::telemetry;

/// Count every request by method and final status
pub async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let response = next.run(request).await;
    telemetry::record_http_request(&method, response.status().as_u16());
    response
}
