//! Error handler for the user registry.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::Error as SQLxError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::Envelope;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Fields validated by the [`crate::user::Users`] collection, in
/// declaration order.
pub const FIELDS: [Field; 2] = [Field::Account, Field::Email];

/// Unique field of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Account,
    Email,
}

impl Field {
    /// Name of the field as sent by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Account => "account",
            Field::Email => "email",
        }
    }

    /// Find which field a violated unique constraint protects.
    ///
    /// Anything that is not the account constraint is reported as email.
    pub fn from_constraint(constraint: Option<&str>) -> Self {
        match constraint {
            Some(name) if name.contains(Field::Account.as_str()) => {
                Field::Account
            },
            _ => Field::Email,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("request body is not valid JSON")]
    MalformedBody,

    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error("{0} is already in use")]
    Duplicate(Field),

    #[error("identifier is not a valid UUID")]
    MalformedId,

    #[error("user not found")]
    NotFound,

    #[error("SQL request failed: {0}")]
    Sql(SQLxError),
}

impl From<SQLxError> for ServerError {
    fn from(err: SQLxError) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                ServerError::Duplicate(Field::from_constraint(db.constraint()))
            },
            _ => ServerError::Sql(err),
        }
    }
}

impl ServerError {
    /// HTTP status code sent back to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::MalformedBody
            | ServerError::Validation(_)
            | ServerError::Duplicate(_)
            | ServerError::MalformedId => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Sql(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent back to the client.
    ///
    /// Internal errors stay opaque.
    pub fn message(&self) -> String {
        match self {
            ServerError::MalformedBody => "Invalid JSON format.".into(),
            ServerError::Validation(errors) => first_message(errors),
            ServerError::Duplicate(Field::Account) => {
                "Account is already in use.".into()
            },
            ServerError::Duplicate(Field::Email) => {
                "Email is already in use.".into()
            },
            ServerError::MalformedId => "Invalid id format.".into(),
            ServerError::NotFound => "Not found.".into(),
            ServerError::Sql(_) => "Unknown error.".into(),
        }
    }
}

/// Message of the first failing field.
fn first_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();

    FIELDS
        .iter()
        .filter_map(|field| field_errors.get(field.as_str()))
        .chain(field_errors.values())
        .find_map(|issues| issues.first())
        .map(|issue| match &issue.message {
            Some(message) => message.to_string(),
            None => issue.to_string(),
        })
        .unwrap_or_else(|| "Validation failed.".into())
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if let ServerError::Sql(err) = &self {
            tracing::error!(error = %err, "server returned 500 status");
        }

        (
            self.status(),
            Json(Envelope::<()>::failure(self.message())),
        )
            .into_response()
    }
}
