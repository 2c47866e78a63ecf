use axum::Json;
use axum::extract::State;

use crate::error::Result;
use crate::response::Envelope;
use crate::user::{User, Users};

pub async fn handler(
    State(users): State<Users>,
) -> Result<Json<Envelope<Vec<User>>>> {
    Ok(Json(Envelope::ok(users.find().await?)))
}
