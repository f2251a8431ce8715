//! Handler for the caller's progress history.

use axum::extract::State;
use axum::Json;
use totalgrind_core::progress::ProgressRecord;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/progress
///
/// One record per tracked competition lift, each history in date order.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProgressRecord>>>> {
    let records = state.repos.progress.list_by_user(user.user_id).await?;
    Ok(Json(DataResponse { data: records }))
}
