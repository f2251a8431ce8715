//! Route definitions for the `/days` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::days;
use crate::state::AppState;

/// Routes mounted at `/days`.
///
/// ```text
/// PUT    /{day_id}      -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{day_id}", put(days::complete))
}
