mod repository;
mod service;

#[cfg(test)]
pub(crate) mod memory;

pub use repository::*;
pub use service::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::Field;

/// User as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub account: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a [`User`].
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(
        required(message = "Account is required."),
        length(min = 1, message = "Account is required.")
    )]
    pub account: Option<String>,
    #[validate(
        required(message = "Email is required."),
        length(min = 1, message = "Email is required."),
        email(message = "Email must be formatted.")
    )]
    pub email: Option<String>,
}

/// Partial update as sent by clients.
///
/// `Some(None)` is an explicit `null`, kept apart from a missing field.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserChanges {
    #[serde(default, deserialize_with = "present")]
    pub account: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UserChanges {
    /// Check the changes and turn them into a [`UserPatch`].
    ///
    /// A field set to `null` fails like a missing required field.
    pub fn into_patch(self) -> Result<UserPatch, ValidationErrors> {
        let nulls = [
            (Field::Account, matches!(self.account, Some(None))),
            (Field::Email, matches!(self.email, Some(None))),
        ];

        let patch = UserPatch {
            account: self.account.flatten(),
            email: self.email.flatten(),
        };

        let mut errors = match patch.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        for (field, null) in nulls {
            if null {
                errors.add(
                    field.as_str(),
                    ValidationError::new("required")
                        .with_message(required_message(field).into()),
                );
            }
        }

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }
}

fn required_message(field: Field) -> &'static str {
    match field {
        Field::Account => "Account is required.",
        Field::Email => "Email is required.",
    }
}

/// Partial update of a [`User`]. Missing fields are left untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(length(min = 1, message = "Account is required."))]
    pub account: Option<String>,
    #[validate(
        length(min = 1, message = "Email is required."),
        email(message = "Email must be formatted.")
    )]
    pub email: Option<String>,
}

impl UserPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.account.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;

    fn changes(body: &str) -> UserChanges {
        serde_json::from_str(body).unwrap()
    }

    fn first_message(errors: ValidationErrors) -> String {
        ServerError::from(errors).message()
    }

    #[test]
    fn test_null_is_not_absent() {
        let body = changes(r#"{"email":null}"#);
        assert_eq!(body.account, None);
        assert_eq!(body.email, Some(None));

        let errors = body.into_patch().unwrap_err();
        assert_eq!(first_message(errors), "Email is required.");
    }

    #[test]
    fn test_null_reported_in_field_order() {
        let errors = changes(r#"{"account":"","email":null}"#)
            .into_patch()
            .unwrap_err();
        assert_eq!(first_message(errors), "Account is required.");

        let errors = changes(r#"{"account":null,"email":"broken"}"#)
            .into_patch()
            .unwrap_err();
        assert_eq!(first_message(errors), "Account is required.");
    }

    #[test]
    fn test_into_patch() {
        let patch = changes(r#"{"account":"alice"}"#).into_patch().unwrap();
        assert_eq!(patch.account.as_deref(), Some("alice"));
        assert!(patch.email.is_none());

        assert!(changes("{}").into_patch().unwrap().is_empty());
    }
}
