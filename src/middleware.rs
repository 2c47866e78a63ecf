//! Middlewares for routes.

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;

use crate::ServerError;
use crate::error::Result;

/// Largest accepted JSON body, in bytes.
pub const BODY_LIMIT: usize = 100 * 1024;

/// Whether the request declares a JSON body (`application/json` or any
/// `application/*+json`).
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| {
            let essence = essence.trim().to_ascii_lowercase();
            essence == "application/json"
                || (essence.starts_with("application/")
                    && essence.ends_with("+json"))
        })
        .unwrap_or(false)
}

/// Reject every JSON request whose body is not a JSON object or array.
///
/// Runs before routing, so unknown paths answer `400` too when the body is
/// broken.
pub async fn reject_malformed_json(
    req: Request,
    next: Next,
) -> Result<Response> {
    if !is_json(req.headers()) {
        return Ok(next.run(req).await);
    }

    let (parts, body) = req.into_parts();
    let body_bytes = axum::body::to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|err| {
            tracing::debug!(error = %err, "cannot read request body");
            ServerError::MalformedBody
        })?;

    if !body_bytes.is_empty() {
        match serde_json::from_slice::<Value>(&body_bytes) {
            Ok(Value::Object(_)) | Ok(Value::Array(_)) => (),
            Ok(_) => return Err(ServerError::MalformedBody),
            Err(err) => {
                tracing::debug!(error = %err, "request body is not JSON");
                return Err(ServerError::MalformedBody);
            },
        }
    }

    let req = Request::from_parts(parts, Body::from(body_bytes));
    Ok(next.run(req).await)
}
