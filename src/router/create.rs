use axum::Json;
use axum::extract::State;

use crate::error::Result;
use crate::response::Envelope;
use crate::router::JsonBody;
use crate::user::{NewUser, User, Users};

/// Handler to create user.
pub async fn handler(
    State(users): State<Users>,
    JsonBody(body): JsonBody<NewUser>,
) -> Result<Json<Envelope<User>>> {
    let user = users.create(body).await.inspect_err(|err| {
        tracing::info!(error = %err, "user not created");
    })?;

    tracing::info!(user_id = %user.id, "user created");

    Ok(Json(Envelope::ok(user)))
}
