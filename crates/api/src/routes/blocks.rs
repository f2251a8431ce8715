//! Route definitions for the `/blocks` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::blocks;
use crate::state::AppState;

/// Routes mounted at `/blocks`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(blocks::list).post(blocks::create))
        .route(
            "/{id}",
            get(blocks::get_by_id)
                .put(blocks::update)
                .delete(blocks::delete),
        )
}
