//! Get a single user.

use axum::Json;
use axum::extract::{Path, State};

use crate::ServerError;
use crate::error::Result;
use crate::response::Envelope;
use crate::user::{User, Users};

pub async fn handler(
    State(users): State<Users>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<User>>> {
    tracing::debug!(%id, "fetching user");

    let user = users
        .find_by_id(&id)
        .await
        .inspect_err(|err| tracing::info!(%id, error = %err, "user lookup failed"))?
        .ok_or(ServerError::NotFound)?;

    Ok(Json(Envelope::ok(user)))
}
