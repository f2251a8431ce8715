pub mod admin;
pub mod blocks;
pub mod coach;
pub mod days;
pub mod health;
pub mod user;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route requires a Bearer token. Route hierarchy:
///
/// ```text
/// /blocks                                      list, create
/// /blocks/{id}                                 get, update, delete
///
/// /days/{day_id}                               complete day (PUT)
///
/// /progress                                    caller's progress (GET)
///
/// /estimates/one-rep-max                       e1RM preview (POST)
///
/// /user/me                                     profile with coach (GET)
/// /user/profile                                update name (PUT)
/// /user/invites                                pending invitations (GET)
/// /user/invites/{coach_id}/accept              accept (POST)
/// /user/invites/{coach_id}/reject              reject (POST)
/// /users/role                                  switch athlete/coach (PUT)
///
/// /coach/athletes                              roster, invite (coach only)
/// /coach/athletes/{athlete_id}                 remove (DELETE)
/// /coach/athletes/{athlete_id}/progress        athlete progress (GET)
/// /coach/athletes/{athlete_id}/blocks          athlete blocks, assign block
///
/// /admin/stats                                 counts (admin only)
/// /admin/users                                 list, create
/// /admin/users/{id}                            detail, update, delete
/// /admin/users/{id}/athletes                   roster (GET)
/// /admin/users/{id}/blocks                     assign block (POST)
/// /admin/users/{coach_id}/athletes/{athlete_id} link, unlink
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Training blocks and day completion.
        .nest("/blocks", blocks::router())
        .nest("/days", days::router())
        .route("/progress", get(handlers::progress::list))
        .route(
            "/estimates/one-rep-max",
            post(handlers::estimates::one_rep_max),
        )
        // The caller's own account.
        .nest("/user", user::router())
        .nest("/users", user::users_router())
        // Coach roster management.
        .nest("/coach", coach::router())
        // Admin user management.
        .nest("/admin", admin::router())
}
