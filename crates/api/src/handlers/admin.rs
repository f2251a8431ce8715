//! Handlers for the `/admin` resource (user management, coach assignment).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use totalgrind_core::error::CoreError;
use totalgrind_core::progress::ProgressRecord;
use totalgrind_core::roles::Role;
use totalgrind_core::training::BlockSource;
use totalgrind_core::types::DbId;
use totalgrind_db::models::block::TrainingBlock;
use totalgrind_db::models::user::{CreateUser, UpdateUser, User, UserSummary};
use validator::Validate;

use super::blocks::{build_block, insert_block, CreateBlockRequest};
use super::links::{ensure_coach, ensure_user_exists, persist_link, roster_of, unlink_athlete};
use super::require_name;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
///
/// Profile only: credentials live with the identity issuer.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Request body for `PUT /admin/users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub athletes: i64,
    pub coaches: i64,
    pub admins: i64,
    pub blocks: i64,
    pub progress_records: i64,
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub user: User,
    pub blocks: Vec<TrainingBlock>,
    pub progress: Vec<ProgressRecord>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<AdminStats>> {
    let users = &state.repos.users;
    let athletes = users.count_by_role(Role::Athlete).await?;
    let coaches = users.count_by_role(Role::Coach).await?;
    let admins = users.count_by_role(Role::Admin).await?;

    Ok(Json(AdminStats {
        total_users: athletes + coaches + admins,
        athletes,
        coaches,
        admins,
        blocks: state.repos.blocks.count().await?,
        progress_records: state.repos.progress.count_records().await?,
    }))
}

/// GET /api/v1/admin/users
///
/// All users, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = state.repos.users.list().await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    input.validate()?;
    let name = require_name(&input.name)?;
    let role: Role = input.role.parse()?;

    let user = state
        .repos
        .users
        .create(&CreateUser {
            email: input.email,
            name,
            role,
        })
        .await?;

    tracing::info!(user_id = user.id, role = %role, admin_id = admin.user_id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/admin/users/{id}
///
/// The user together with their blocks and progress.
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserDetail>> {
    let user = ensure_user_exists(&state, id).await?;
    let blocks = state.repos.blocks.list_by_owner(id).await?;
    let progress = state.repos.progress.list_by_user(id).await?;
    Ok(Json(UserDetail {
        user,
        blocks,
        progress,
    }))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    input.validate()?;
    let role = input.role.as_deref().map(str::parse::<Role>).transpose()?;

    let update = UpdateUser {
        name: input.name.as_deref().map(require_name).transpose()?,
        email: input.email,
        role,
    };
    let user = state
        .repos
        .users
        .update(id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", id)))?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User updated");
    Ok(Json(user))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Admin accounts cannot be deleted. The user's coach links are dissolved
/// first; their blocks and progress go with them.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    let mut user = ensure_user_exists(&state, id).await?;
    if user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot delete admin accounts".into(),
        )));
    }

    if let Some(coach_id) = user.link.coach_id {
        if let Some(mut coach) = state.repos.users.find_by_id(coach_id).await? {
            unlink_athlete(&state, &mut coach, id).await?;
        }
    }
    for athlete_id in user.athletes.clone() {
        unlink_athlete(&state, &mut user, athlete_id).await?;
    }

    if !state.repos.users.delete(id).await? {
        return Err(AppError::Core(CoreError::not_found("User", id)));
    }

    tracing::info!(user_id = id, admin_id = admin.user_id, "User deleted");
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/v1/admin/users/{id}/athletes
pub async fn list_user_athletes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let coach = ensure_user_exists(&state, id).await?;
    let athletes = roster_of(&state, &coach).await?;
    Ok(Json(DataResponse { data: athletes }))
}

/// POST /api/v1/admin/users/{coach_id}/athletes/{athlete_id}
///
/// Link directly, with the same effect as the athlete accepting an invite.
pub async fn assign_athlete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((coach_id, athlete_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<SuccessResponse>> {
    if coach_id == athlete_id {
        return Err(AppError::Core(CoreError::Validation(
            "A user cannot coach themselves".into(),
        )));
    }
    let mut coach = ensure_coach(&state, coach_id).await?;
    let mut athlete = ensure_user_exists(&state, athlete_id).await?;

    let previous = athlete.link.link_to(coach_id);
    persist_link(&state, &athlete, &mut coach, previous).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/v1/admin/users/{coach_id}/athletes/{athlete_id}
pub async fn remove_athlete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((coach_id, athlete_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<SuccessResponse>> {
    let mut coach = ensure_user_exists(&state, coach_id).await?;
    unlink_athlete(&state, &mut coach, athlete_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/v1/admin/users/{id}/blocks
///
/// Create an `assigned` block for the user, signed with the admin's name.
pub async fn assign_block(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<CreateBlockRequest>,
) -> AppResult<(StatusCode, Json<TrainingBlock>)> {
    ensure_user_exists(&state, id).await?;
    let input = build_block(id, input, BlockSource::Assigned, Some(admin.name))?;
    let block = insert_block(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(block)))
}
