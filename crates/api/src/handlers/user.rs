//! Handlers for the caller's own account: profile, role, and the invitations
//! coaches have sent them.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use totalgrind_core::coaching::CoachRequest;
use totalgrind_core::error::CoreError;
use totalgrind_core::roles::Role;
use totalgrind_core::types::DbId;
use totalgrind_db::models::user::{UpdateUser, User, UserSummary};

use super::links::{ensure_user_exists, persist_link, save_links};
use super::require_name;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
    /// The linked coach, resolved.
    pub coach: Option<UserSummary>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
}

/// Body for `PUT /users/role`. Kept as a string so unknown roles are a 400.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    #[serde(default)]
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/user/me
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<MeResponse>> {
    let me = ensure_user_exists(&state, user.user_id).await?;
    let coach = match me.link.coach_id {
        Some(coach_id) => state
            .repos
            .users
            .find_by_id(coach_id)
            .await?
            .map(|c| c.summary()),
        None => None,
    };
    Ok(Json(MeResponse { user: me, coach }))
}

/// PUT /api/v1/user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<User>> {
    let update = UpdateUser {
        name: Some(require_name(&input.name)?),
        ..UpdateUser::default()
    };
    let updated = state
        .repos
        .users
        .update(user.user_id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user.user_id)))?;
    Ok(Json(updated))
}

/// PUT /api/v1/users/role
///
/// Self-service switch between athlete and coach.
pub async fn set_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SetRoleRequest>,
) -> AppResult<Json<User>> {
    let role = input
        .role
        .parse::<Role>()
        .ok()
        .filter(|r| r.is_self_assignable())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Invalid role. Must be 'athlete' or 'coach'".into(),
            ))
        })?;

    let update = UpdateUser {
        role: Some(role),
        ..UpdateUser::default()
    };
    let updated = state
        .repos
        .users
        .update(user.user_id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user.user_id)))?;

    tracing::info!(user_id = user.user_id, role = %role, "User role changed");
    Ok(Json(updated))
}

/// GET /api/v1/user/invites
pub async fn list_invites(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<CoachRequest>>>> {
    let me = ensure_user_exists(&state, user.user_id).await?;
    Ok(Json(DataResponse {
        data: me.link.coach_requests,
    }))
}

/// POST /api/v1/user/invites/{coach_id}/accept
///
/// Link to the inviting coach and drop every pending invitation.
pub async fn accept_invite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(coach_id): Path<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    let mut coach = ensure_user_exists(&state, coach_id).await?;
    let mut me = ensure_user_exists(&state, user.user_id).await?;

    let previous = me.link.accept(coach_id)?;
    persist_link(&state, &me, &mut coach, previous).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/v1/user/invites/{coach_id}/reject
///
/// Drop only this coach's invitation. Rejecting a missing invitation is a
/// no-op.
pub async fn reject_invite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(coach_id): Path<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    let mut me = ensure_user_exists(&state, user.user_id).await?;
    if me.link.reject(coach_id) {
        save_links(&state, &me).await?;
        tracing::info!(user_id = me.id, coach_id, "Coach invitation rejected");
    }
    Ok(Json(SuccessResponse::ok()))
}
