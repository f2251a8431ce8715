//! Route definitions for the `/coach` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::coach;
use crate::state::AppState;

/// Routes mounted at `/coach`.
///
/// All routes require the `coach` role (enforced by handler extractors).
///
/// ```text
/// GET    /athletes                        -> list_athletes
/// POST   /athletes                        -> invite_athlete
/// DELETE /athletes/{athlete_id}           -> remove_athlete
/// GET    /athletes/{athlete_id}/progress  -> athlete_progress
/// GET    /athletes/{athlete_id}/blocks    -> athlete_blocks
/// POST   /athletes/{athlete_id}/blocks    -> assign_block
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/athletes",
            get(coach::list_athletes).post(coach::invite_athlete),
        )
        .route("/athletes/{athlete_id}", delete(coach::remove_athlete))
        .route(
            "/athletes/{athlete_id}/progress",
            get(coach::athlete_progress),
        )
        .route(
            "/athletes/{athlete_id}/blocks",
            get(coach::athlete_blocks).post(coach::assign_block),
        )
}
