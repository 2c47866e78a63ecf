//! Partially update user data.

use axum::Json;
use axum::extract::{Path, State};

use crate::ServerError;
use crate::error::Result;
use crate::response::Envelope;
use crate::router::JsonBody;
use crate::user::{User, UserChanges, Users};

pub async fn handler(
    State(users): State<Users>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UserChanges>,
) -> Result<Json<Envelope<User>>> {
    let user = users
        .find_by_id_and_update(&id, body)
        .await?
        .ok_or(ServerError::NotFound)?;

    Ok(Json(Envelope::ok(user)))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::router::create::tests::create_user;
    use crate::*;

    #[tokio::test]
    async fn test_update_handler() {
        let app = app(router::state());
        let alice = create_user(app.clone(), "alice", "alice@example.com").await;

        let path = format!("/{}", alice.id);
        let response = make_request(
            app.clone(),
            Method::PATCH,
            &path,
            json!({ "email": "alice@example.org", "unknown": true }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Envelope<User> = read_body(response).await;
        let user = body.result.unwrap();
        assert_eq!(user.id, alice.id);
        assert_eq!(user.account, "alice");
        assert_eq!(user.email, "alice@example.org");

        // Changes are persisted.
        let response =
            make_request(app, Method::GET, &path, String::default()).await;
        let body: Envelope<User> = read_body(response).await;
        assert_eq!(body.result, Some(user));
    }

    #[tokio::test]
    async fn test_update_with_taken_email() {
        let app = app(router::state());
        create_user(app.clone(), "alice", "alice@example.com").await;
        let bob = create_user(app.clone(), "bob", "bob@example.com").await;

        let response = make_request(
            app,
            Method::PATCH,
            &format!("/{}", bob.id),
            json!({ "email": "alice@example.com" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Envelope<User> = read_body(response).await;
        assert_eq!(body, Envelope::failure("Email is already in use."));
    }

    #[tokio::test]
    async fn test_update_with_taken_account() {
        let app = app(router::state());
        create_user(app.clone(), "alice", "alice@example.com").await;
        let bob = create_user(app.clone(), "bob", "bob@example.com").await;

        let path = format!("/{}", bob.id);
        let response = make_request(
            app.clone(),
            Method::PATCH,
            &path,
            json!({ "account": "alice" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Envelope<User> = read_body(response).await;
        assert_eq!(body, Envelope::failure("Account is already in use."));

        let response =
            make_request(app, Method::GET, &path, String::default()).await;
        let body: Envelope<User> = read_body(response).await;
        assert_eq!(body.result, Some(bob));
    }

    #[tokio::test]
    async fn test_update_with_null_field() {
        let app = app(router::state());
        let alice = create_user(app.clone(), "alice", "alice@example.com").await;
        let path = format!("/{}", alice.id);

        for (body, message) in [
            (json!({ "email": null }), "Email is required."),
            (json!({ "account": null }), "Account is required."),
        ] {
            let response = make_request(
                app.clone(),
                Method::PATCH,
                &path,
                body.to_string(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let body: Envelope<User> = read_body(response).await;
            assert_eq!(body, Envelope::failure(message));
        }

        let response =
            make_request(app, Method::GET, &path, String::default()).await;
        let body: Envelope<User> = read_body(response).await;
        assert_eq!(body.result, Some(alice));
    }

    #[tokio::test]
    async fn test_update_with_array_body() {
        let app = app(router::state());
        let alice = create_user(app.clone(), "alice", "alice@example.com").await;

        let response = make_request(
            app,
            Method::PATCH,
            &format!("/{}", alice.id),
            json!(["mallory"]).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Envelope<User> = read_body(response).await;
        assert_eq!(body.result, Some(alice));
    }

    #[tokio::test]
    async fn test_update_with_invalid_email() {
        let app = app(router::state());
        let alice = create_user(app.clone(), "alice", "alice@example.com").await;

        let response = make_request(
            app,
            Method::PATCH,
            &format!("/{}", alice.id),
            json!({ "email": "alice" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Envelope<User> = read_body(response).await;
        assert_eq!(body.message, "Email must be formatted.");
    }

    #[tokio::test]
    async fn test_update_with_malformed_id() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::PATCH,
            "/not-an-id",
            json!({ "email": "alice" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Envelope<User> = read_body(response).await;
        assert_eq!(body.message, "Invalid id format.");
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::PATCH,
            "/0b9a6c4e-3f7d-4d7a-9c1e-2a5b8e6f0d13",
            json!({ "account": "ghost" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
