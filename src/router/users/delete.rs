//! Delete user from database.

use axum::Json;
use axum::extract::{Path, State};

use crate::ServerError;
use crate::error::Result;
use crate::response::Envelope;
use crate::user::Users;

pub async fn handler(
    State(users): State<Users>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>> {
    let user = users
        .find_by_id_and_delete(&id)
        .await?
        .ok_or(ServerError::NotFound)?;

    tracing::info!(user_id = %user.id, "user deleted");

    Ok(Json(Envelope::empty()))
}
