//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /stats                                   -> stats
/// GET    /users                                   -> list_users
/// POST   /users                                   -> create_user
/// GET    /users/{id}                              -> get_user
/// PUT    /users/{id}                              -> update_user
/// DELETE /users/{id}                              -> delete_user
/// GET    /users/{id}/athletes                     -> list_user_athletes
/// POST   /users/{id}/blocks                       -> assign_block
/// POST   /users/{coach_id}/athletes/{athlete_id}  -> assign_athlete
/// DELETE /users/{coach_id}/athletes/{athlete_id}  -> remove_athlete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        .route("/users/{id}/athletes", get(admin::list_user_athletes))
        .route("/users/{id}/blocks", post(admin::assign_block))
        .route(
            "/users/{coach_id}/athletes/{athlete_id}",
            post(admin::assign_athlete).delete(admin::remove_athlete),
        )
}
