//! Request handlers, one submodule per resource.
//!
//! Handlers resolve the caller through the auth extractors, delegate to the
//! repositories in `totalgrind_db` and the rules in `totalgrind_core`, and map
//! errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod blocks;
pub mod coach;
pub mod days;
pub mod estimates;
pub mod links;
pub mod progress;
pub mod user;

use totalgrind_core::error::CoreError;
use totalgrind_core::types::CalendarDate;

use crate::error::{AppError, AppResult};

/// Today's date on the server's local calendar.
pub(crate) fn server_today() -> CalendarDate {
    chrono::Local::now().date_naive()
}

/// Trim a display name, rejecting one that is blank.
pub(crate) fn require_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name is required".into(),
        )));
    }
    Ok(name.to_string())
}
