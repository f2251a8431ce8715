//! User lookups and coach/athlete link persistence shared by the user, coach
//! and admin handlers.
//!
//! A link is stored on both sides: `coach_id` on the athlete and the roster
//! on the coach. These helpers keep the two in step.

use totalgrind_core::coaching::{add_to_roster, remove_from_roster};
use totalgrind_core::error::CoreError;
use totalgrind_core::types::DbId;
use totalgrind_db::models::user::{User, UserSummary};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load a user or fail with 404.
pub(crate) async fn ensure_user_exists(state: &AppState, id: DbId) -> AppResult<User> {
    state
        .repos
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", id)))
}

/// Load a user who must hold the coach role.
pub(crate) async fn ensure_coach(state: &AppState, id: DbId) -> AppResult<User> {
    let user = ensure_user_exists(state, id).await?;
    if !user.is_coach() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {id} is not a coach"
        ))));
    }
    Ok(user)
}

/// Summaries of the athletes on a coach's roster.
pub(crate) async fn roster_of(state: &AppState, coach: &User) -> AppResult<Vec<UserSummary>> {
    let athletes = state.repos.users.find_many(&coach.athletes).await?;
    Ok(athletes.iter().map(User::summary).collect())
}

/// Write back `user`'s coach fields; a user deleted meanwhile is a 404.
pub(crate) async fn save_links(state: &AppState, user: &User) -> AppResult<()> {
    if !state.repos.users.save_links(user).await? {
        return Err(AppError::Core(CoreError::not_found("User", user.id)));
    }
    Ok(())
}

/// Persist a freshly linked athlete and bring the rosters in line.
///
/// `athlete.link` must already point at `coach` (see
/// [`AthleteLink::accept`](totalgrind_core::coaching::AthleteLink::accept) and
/// [`AthleteLink::link_to`](totalgrind_core::coaching::AthleteLink::link_to)).
/// `previous` is the coach the athlete was linked to before, whose roster
/// drops the athlete.
pub(crate) async fn persist_link(
    state: &AppState,
    athlete: &User,
    coach: &mut User,
    previous: Option<DbId>,
) -> AppResult<()> {
    save_links(state, athlete).await?;

    if add_to_roster(&mut coach.athletes, athlete.id) {
        save_links(state, coach).await?;
    }

    if let Some(previous_id) = previous {
        if let Some(mut previous_coach) = state.repos.users.find_by_id(previous_id).await? {
            if remove_from_roster(&mut previous_coach.athletes, athlete.id) {
                save_links(state, &previous_coach).await?;
            }
        }
    }

    tracing::info!(
        athlete_id = athlete.id,
        coach_id = coach.id,
        previous_coach_id = ?previous,
        "Athlete linked to coach"
    );
    Ok(())
}

/// Remove an athlete from a coach: roster entry and the athlete's link, if it
/// points at this coach. A missing athlete only affects the roster.
pub(crate) async fn unlink_athlete(
    state: &AppState,
    coach: &mut User,
    athlete_id: DbId,
) -> AppResult<()> {
    if remove_from_roster(&mut coach.athletes, athlete_id) {
        save_links(state, coach).await?;
    }

    if let Some(mut athlete) = state.repos.users.find_by_id(athlete_id).await? {
        if athlete.link.unlink(coach.id) {
            save_links(state, &athlete).await?;
        }
    }

    tracing::info!(athlete_id, coach_id = coach.id, "Athlete unlinked from coach");
    Ok(())
}
