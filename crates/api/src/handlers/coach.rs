//! Handlers for the `/coach` resource: a coach's roster and the athletes on it.
//!
//! All handlers require the `coach` role via [`RequireCoach`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use totalgrind_core::error::CoreError;
use totalgrind_core::progress::ProgressRecord;
use totalgrind_core::training::BlockSource;
use totalgrind_core::types::DbId;
use totalgrind_db::models::block::TrainingBlock;
use totalgrind_db::models::user::{normalize_email, User, UserSummary};

use super::blocks::{build_block, insert_block, CreateBlockRequest};
use super::links::{ensure_user_exists, roster_of, save_links, unlink_athlete};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireCoach;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteAthleteRequest {
    #[serde(default)]
    pub athlete_email: String,
}

/// Load the coach and check `athlete_id` is on their roster.
async fn ensure_on_roster(state: &AppState, coach_id: DbId, athlete_id: DbId) -> AppResult<User> {
    let coach = ensure_user_exists(state, coach_id).await?;
    if !coach.athletes.contains(&athlete_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Athlete is not on your roster".into(),
        )));
    }
    Ok(coach)
}

/// GET /api/v1/coach/athletes
pub async fn list_athletes(
    State(state): State<AppState>,
    RequireCoach(user): RequireCoach,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let coach = ensure_user_exists(&state, user.user_id).await?;
    let athletes = roster_of(&state, &coach).await?;
    Ok(Json(DataResponse { data: athletes }))
}

/// POST /api/v1/coach/athletes
///
/// Send an invitation to the athlete with the given email.
pub async fn invite_athlete(
    State(state): State<AppState>,
    RequireCoach(user): RequireCoach,
    Json(input): Json<InviteAthleteRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let email = normalize_email(&input.athlete_email);
    if email.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Athlete email is required".into(),
        )));
    }

    let mut athlete = state
        .repos
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", &email)))?;

    athlete.link.invite(athlete.id, user.user_id, &user.name)?;
    save_links(&state, &athlete).await?;

    tracing::info!(
        coach_id = user.user_id,
        athlete_id = athlete.id,
        "Coach invitation sent"
    );
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/v1/coach/athletes/{athlete_id}
pub async fn remove_athlete(
    State(state): State<AppState>,
    RequireCoach(user): RequireCoach,
    Path(athlete_id): Path<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    let mut coach = ensure_user_exists(&state, user.user_id).await?;
    unlink_athlete(&state, &mut coach, athlete_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/v1/coach/athletes/{athlete_id}/progress
pub async fn athlete_progress(
    State(state): State<AppState>,
    RequireCoach(user): RequireCoach,
    Path(athlete_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProgressRecord>>>> {
    ensure_on_roster(&state, user.user_id, athlete_id).await?;
    let records = state.repos.progress.list_by_user(athlete_id).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/coach/athletes/{athlete_id}/blocks
pub async fn athlete_blocks(
    State(state): State<AppState>,
    RequireCoach(user): RequireCoach,
    Path(athlete_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TrainingBlock>>>> {
    ensure_on_roster(&state, user.user_id, athlete_id).await?;
    let blocks = state.repos.blocks.list_by_owner(athlete_id).await?;
    Ok(Json(DataResponse { data: blocks }))
}

/// POST /api/v1/coach/athletes/{athlete_id}/blocks
///
/// Create an `assigned` block owned by the athlete.
pub async fn assign_block(
    State(state): State<AppState>,
    RequireCoach(user): RequireCoach,
    Path(athlete_id): Path<DbId>,
    Json(input): Json<CreateBlockRequest>,
) -> AppResult<(StatusCode, Json<TrainingBlock>)> {
    ensure_on_roster(&state, user.user_id, athlete_id).await?;
    let input = build_block(athlete_id, input, BlockSource::Assigned, Some(user.name))?;
    let block = insert_block(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(block)))
}
