//! e1RM preview, sharing the formula used by progress aggregation.

use axum::Json;
use serde::{Deserialize, Serialize};
use totalgrind_core::one_rep_max::estimate_from_inputs;
use totalgrind_core::training::loose_number;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Numbers may arrive as JSON numbers or numeric strings.
#[derive(Debug, Deserialize, Validate)]
pub struct EstimateRequest {
    #[serde(default, deserialize_with = "loose_number")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub reps: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub rpe: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    /// `null` when weight or reps are missing or not positive.
    #[serde(rename = "estimated1rm")]
    pub estimated_1rm: Option<f64>,
}

/// POST /api/v1/estimates/one-rep-max
pub async fn one_rep_max(
    _user: AuthUser,
    Json(input): Json<EstimateRequest>,
) -> AppResult<Json<EstimateResponse>> {
    input.validate()?;
    Ok(Json(EstimateResponse {
        estimated_1rm: estimate_from_inputs(input.weight, input.reps, input.rpe),
    }))
}
