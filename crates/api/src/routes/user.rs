//! Route definitions for the caller's own account.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET    /me                          -> me
/// PUT    /profile                     -> update_profile
/// GET    /invites                     -> list_invites
/// POST   /invites/{coach_id}/accept   -> accept_invite
/// POST   /invites/{coach_id}/reject   -> reject_invite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(user::me))
        .route("/profile", put(user::update_profile))
        .route("/invites", get(user::list_invites))
        .route("/invites/{coach_id}/accept", post(user::accept_invite))
        .route("/invites/{coach_id}/reject", post(user::reject_invite))
}

/// Routes mounted at `/users`.
///
/// ```text
/// PUT    /role                        -> set_role
/// ```
pub fn users_router() -> Router<AppState> {
    Router::new().route("/role", put(user::set_role))
}
