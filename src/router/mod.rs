pub mod create;
pub mod users;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::ServerError;
use crate::middleware::is_json;

/// JSON body extractor answering [`ServerError::MalformedBody`] on any
/// rejection.
///
/// Requests without a JSON content-type, with an empty body, or whose body
/// is not a JSON object are read as an empty object.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let json = is_json(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ServerError::MalformedBody)?;

        let value = if json && !bytes.is_empty() {
            serde_json::from_slice(&bytes)
                .map_err(|_| ServerError::MalformedBody)?
        } else {
            Value::Null
        };

        // Arrays carry no named fields.
        let value = match value {
            Value::Object(fields) => Value::Object(fields),
            _ => Value::Object(Map::new()),
        };

        serde_json::from_value(value).map(JsonBody).map_err(|err| {
            tracing::debug!(error = %err, "request body does not match schema");
            ServerError::MalformedBody
        })
    }
}

/// Any unknown route or method.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

/// Application state backed by an empty in-memory store.
#[cfg(test)]
pub fn state() -> crate::AppState {
    use std::sync::Arc;

    crate::AppState {
        config: Arc::new(crate::config::Configuration::default()),
        users: crate::user::Users::new(Arc::new(
            crate::user::memory::MemoryStore::default(),
        )),
    }
}
