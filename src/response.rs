//! Uniform JSON response sent by every route.

use serde::{Deserialize, Serialize};

/// `{ success, message, result? }` envelope.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful response carrying `result`.
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            message: String::default(),
            result: Some(result),
        }
    }

    /// Successful response without payload.
    pub fn empty() -> Self {
        Self {
            success: true,
            message: String::default(),
            result: None,
        }
    }

    /// Failed response with a client-facing message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            result: None,
        }
    }
}
