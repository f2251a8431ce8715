//! Handler for completing a training day.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use totalgrind_core::error::CoreError;
use totalgrind_core::progress::{summarize_day, LiftSummary};
use totalgrind_core::training::{Day, DaySubmission};
use totalgrind_core::types::DbId;

use super::server_today;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteDayResponse {
    pub success: bool,
    pub block_id: DbId,
    pub day: Day,
    /// Competition-lift summaries merged into progress by this submission.
    pub tracked_lifts: Vec<LiftSummary>,
}

/// PUT /api/v1/days/{day_id}
///
/// Replace the day's exercises, mark it complete, and merge the day's
/// competition-lift bests into the caller's progress for today. Only days in
/// the caller's own blocks can be completed.
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(day_id): Path<String>,
    Json(submission): Json<DaySubmission>,
) -> AppResult<Json<CompleteDayResponse>> {
    submission.check()?;

    let tracked_lifts = summarize_day(&submission.exercises);
    let completed = state
        .repos
        .workouts
        .complete_day(
            user.user_id,
            &day_id,
            &submission,
            &tracked_lifts,
            server_today(),
        )
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Day", &day_id)))?;

    tracing::info!(
        user_id = user.user_id,
        block_id = completed.block_id,
        day_id = %day_id,
        tracked = tracked_lifts.len(),
        "Training day completed"
    );

    Ok(Json(CompleteDayResponse {
        success: true,
        block_id: completed.block_id,
        day: completed.day,
        tracked_lifts,
    }))
}
