//! Users-related HTTP API.
mod delete;
mod get;
mod list;
mod update;

use axum::Router;
use axum::routing::get;

use crate::AppState;
use crate::router::{create, not_found};

pub fn router() -> Router<AppState> {
    Router::new()
        // `GET /` goes to `list`, `POST /` goes to `create`.
        .route(
            "/",
            get(list::handler).post(create::handler).fallback(not_found),
        )
        // `GET`, `PATCH` and `DELETE /{id}` target a single user.
        .route(
            "/{id}",
            get(get::handler)
                .patch(update::handler)
                .delete(delete::handler)
                .fallback(not_found),
        )
}
