//! Repository interfaces, one per entity, plus the Postgres implementation.
//!
//! Handlers only ever see the traits (through [`Repositories`]), so the
//! Postgres store and the in-memory store in [`crate::memory`] are
//! interchangeable.

use std::sync::Arc;

use async_trait::async_trait;
use totalgrind_core::progress::{LiftSummary, ProgressRecord};
use totalgrind_core::roles::Role;
use totalgrind_core::training::DaySubmission;
use totalgrind_core::types::{CalendarDate, DbId};

use crate::error::DbResult;
use crate::memory::MemoryStore;
use crate::models::block::{CompletedDay, CreateBlock, TrainingBlock};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::DbPool;

mod block_repo;
mod progress_repo;
mod user_repo;
mod workout_repo;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `UniqueViolation` on a taken email.
    async fn create(&self, input: &CreateUser) -> DbResult<User>;

    async fn find_by_id(&self, id: DbId) -> DbResult<Option<User>>;

    /// Lookup by already-normalized (lower-case) email.
    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>>;

    /// Fetch several users at once, ordered by id. Unknown ids are skipped.
    async fn find_many(&self, ids: &[DbId]) -> DbResult<Vec<User>>;

    /// All users, most recently created first.
    async fn list(&self) -> DbResult<Vec<User>>;

    /// Apply the non-`None` fields. Returns `None` if the user does not exist.
    async fn update(&self, id: DbId, input: &UpdateUser) -> DbResult<Option<User>>;

    /// Persist the coach relationship fields (`coach_id`, `coach_requests`,
    /// `athletes`) of `user`. Returns `false` if the user no longer exists.
    async fn save_links(&self, user: &User) -> DbResult<bool>;

    /// Delete the user. Owned blocks and progress go with them, and every
    /// reference other users hold to them (coach link, roster entry, pending
    /// invitation) is dropped.
    async fn delete(&self, id: DbId) -> DbResult<bool>;

    async fn count_by_role(&self, role: Role) -> DbResult<i64>;
}

#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn create(&self, input: &CreateBlock) -> DbResult<TrainingBlock>;

    async fn find_by_id(&self, id: DbId) -> DbResult<Option<TrainingBlock>>;

    /// All blocks owned by `owner_id`, oldest first.
    async fn list_by_owner(&self, owner_id: DbId) -> DbResult<Vec<TrainingBlock>>;

    /// Write back the mutable fields of `block` in full. Returns the stored
    /// row, or `None` if the block no longer exists.
    async fn save(&self, block: &TrainingBlock) -> DbResult<Option<TrainingBlock>>;

    async fn delete(&self, id: DbId) -> DbResult<bool>;

    async fn count(&self) -> DbResult<i64>;
}

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Every progress record of `user_id`, ordered by exercise name, each
    /// history ordered by date.
    async fn list_by_user(&self, user_id: DbId) -> DbResult<Vec<ProgressRecord>>;

    /// Number of distinct (user, exercise) records.
    async fn count_records(&self) -> DbResult<i64>;
}

#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Complete a day and merge its lift summaries into progress, atomically.
    ///
    /// Searches every block owned by `owner_id` for `day_id`, applies the
    /// submission, saves the block, then merges each trackable summary into
    /// the (owner, exercise) history for `today` (same-day upsert by max).
    /// Returns `None`, writing nothing, if the day is not found.
    async fn complete_day(
        &self,
        owner_id: DbId,
        day_id: &str,
        submission: &DaySubmission,
        lifts: &[LiftSummary],
        today: CalendarDate,
    ) -> DbResult<Option<CompletedDay>>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Confirm the backing store is reachable.
    async fn ping(&self) -> DbResult<()>;
}

/// The full set of repositories handed to request handlers.
#[derive(Clone)]
pub struct Repositories {
    pub health: Arc<dyn StoreHealth>,
    pub users: Arc<dyn UserRepository>,
    pub blocks: Arc<dyn BlockRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub workouts: Arc<dyn WorkoutRepository>,
}

impl Repositories {
    /// Repositories backed by PostgreSQL.
    pub fn postgres(pool: DbPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            health: store.clone(),
            users: store.clone(),
            blocks: store.clone(),
            progress: store.clone(),
            workouts: store,
        }
    }

    /// Repositories backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            health: store.clone(),
            users: store.clone(),
            blocks: store.clone(),
            progress: store.clone(),
            workouts: store,
        }
    }
}

/// PostgreSQL implementation of every repository trait.
///
/// The trait impls live in the per-entity `*_repo` modules.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> DbResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
