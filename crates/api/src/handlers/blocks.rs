//! Handlers for the `/blocks` resource.
//!
//! Reads are open to the owner, the owner's linked coach and admins. Updates
//! and deletes go through the rules in [`totalgrind_core::block_access`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use totalgrind_core::block_access::{
    authorize_block_delete, authorize_block_update, authorize_block_view, BlockOwnership,
};
use totalgrind_core::error::CoreError;
use totalgrind_core::training::{assign_missing_ids, default_weeks, BlockSource, Week};
use totalgrind_core::types::{CalendarDate, DbId};
use totalgrind_db::models::block::{CreateBlock, TrainingBlock};

use super::server_today;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for every block-creating endpoint.
///
/// The source is decided by the endpoint, never by the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockRequest {
    #[serde(default)]
    pub title: String,
    pub start_date: Option<CalendarDate>,
    pub weeks: Option<Vec<Week>>,
}

/// Body for `PUT /blocks/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlockRequest {
    pub title: Option<String>,
    pub start_date: Option<CalendarDate>,
    pub source: Option<BlockSource>,
    pub assigned_by: Option<String>,
    pub weeks: Option<Vec<Week>>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title is required".into(),
        )));
    }
    Ok(title.to_string())
}

/// Turn a create request into a block for `owner_id`, applying defaults:
/// today's start date and a single empty day.
pub(crate) fn build_block(
    owner_id: DbId,
    input: CreateBlockRequest,
    source: BlockSource,
    assigned_by: Option<String>,
) -> AppResult<CreateBlock> {
    let title = require_title(&input.title)?;
    let weeks = match input.weeks {
        Some(mut weeks) => {
            assign_missing_ids(&mut weeks);
            weeks
        }
        None => default_weeks(),
    };
    Ok(CreateBlock {
        owner_id,
        title,
        source,
        assigned_by,
        start_date: input.start_date.unwrap_or_else(server_today),
        weeks,
    })
}

/// Create a block and log it.
pub(crate) async fn insert_block(state: &AppState, input: &CreateBlock) -> AppResult<TrainingBlock> {
    let block = state.repos.blocks.create(input).await?;
    tracing::info!(
        block_id = block.id,
        owner_id = block.owner_id,
        source = %block.source,
        "Training block created"
    );
    Ok(block)
}

/// Load a block together with the facts access decisions need.
async fn ensure_block_exists(
    state: &AppState,
    id: DbId,
) -> AppResult<(TrainingBlock, BlockOwnership)> {
    let block = state
        .repos
        .blocks
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Block", id)))?;
    let owner_coach_id = state
        .repos
        .users
        .find_by_id(block.owner_id)
        .await?
        .and_then(|owner| owner.link.coach_id);
    let ownership = block.ownership(owner_coach_id);
    Ok((block, ownership))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/blocks
///
/// The caller's own blocks.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<TrainingBlock>>>> {
    let blocks = state.repos.blocks.list_by_owner(user.user_id).await?;
    Ok(Json(DataResponse { data: blocks }))
}

/// POST /api/v1/blocks
///
/// Create a personal block for the caller.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateBlockRequest>,
) -> AppResult<(StatusCode, Json<TrainingBlock>)> {
    let input = build_block(user.user_id, input, BlockSource::Personal, None)?;
    let block = insert_block(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

/// GET /api/v1/blocks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TrainingBlock>> {
    let (block, ownership) = ensure_block_exists(&state, id).await?;
    authorize_block_view(&ownership, &user.requester())?;
    Ok(Json(block))
}

/// PUT /api/v1/blocks/{id}
///
/// Partial update. Replaced weeks get ids for any new nested entries.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBlockRequest>,
) -> AppResult<Json<TrainingBlock>> {
    let (mut block, ownership) = ensure_block_exists(&state, id).await?;
    authorize_block_update(&ownership, &user.requester())?;

    if let Some(title) = &input.title {
        block.title = require_title(title)?;
    }
    if let Some(start_date) = input.start_date {
        block.start_date = start_date;
    }
    if let Some(source) = input.source {
        block.source = source;
    }
    if let Some(assigned_by) = input.assigned_by {
        block.assigned_by = Some(assigned_by);
    }
    if let Some(mut weeks) = input.weeks {
        assign_missing_ids(&mut weeks);
        block.weeks = weeks;
    }

    let block = state
        .repos
        .blocks
        .save(&block)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Block", id)))?;

    tracing::info!(block_id = id, user_id = user.user_id, "Training block updated");
    Ok(Json(block))
}

/// DELETE /api/v1/blocks/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    let (_, ownership) = ensure_block_exists(&state, id).await?;
    authorize_block_delete(&ownership, &user.requester())?;

    if !state.repos.blocks.delete(id).await? {
        return Err(AppError::Core(CoreError::not_found("Block", id)));
    }

    tracing::info!(block_id = id, user_id = user.user_id, "Training block deleted");
    Ok(Json(SuccessResponse::ok()))
}
