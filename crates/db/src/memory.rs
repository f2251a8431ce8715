//! In-memory implementation of every repository trait.
//!
//! Backs the HTTP test-suite and local experiments without a database. All
//! state sits behind one [`RwLock`], so each trait method is atomic with
//! respect to the others, day completion included.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use totalgrind_core::coaching::AthleteLink;
use totalgrind_core::progress::{LiftSummary, ProgressRecord};
use totalgrind_core::roles::Role;
use totalgrind_core::training::{find_day_mut, DaySubmission};
use totalgrind_core::types::{CalendarDate, DbId};

use crate::error::{DbError, DbResult};
use crate::models::block::{CompletedDay, CreateBlock, TrainingBlock};
use crate::models::user::{normalize_email, CreateUser, UpdateUser, User};
use crate::repositories::{
    BlockRepository, ProgressRepository, StoreHealth, UserRepository, WorkoutRepository,
};

/// Name reported for a duplicate email, matching the Postgres constraint.
const EMAIL_CONSTRAINT: &str = "uq_users_email";

#[derive(Default)]
struct MemoryState {
    next_user_id: DbId,
    next_block_id: DbId,
    users: BTreeMap<DbId, User>,
    blocks: BTreeMap<DbId, TrainingBlock>,
    progress: BTreeMap<(DbId, String), ProgressRecord>,
}

impl MemoryState {
    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, input: &CreateUser) -> DbResult<User> {
        let mut state = self.state.write().await;
        let email = normalize_email(&input.email);
        if state.email_taken(&email, None) {
            return Err(DbError::UniqueViolation(EMAIL_CONSTRAINT.to_string()));
        }

        state.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.next_user_id,
            email,
            name: input.name.clone(),
            role: input.role,
            link: AthleteLink::default(),
            athletes: Vec::new(),
            profile_picture: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> DbResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[DbId]) -> DbResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> DbResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn update(&self, id: DbId, input: &UpdateUser) -> DbResult<Option<User>> {
        let mut state = self.state.write().await;
        let email = input.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            if state.email_taken(email, Some(id)) {
                return Err(DbError::UniqueViolation(EMAIL_CONSTRAINT.to_string()));
            }
        }

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            user.name = name.clone();
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(role) = input.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn save_links(&self, user: &User) -> DbResult<bool> {
        let mut state = self.state.write().await;
        let Some(stored) = state.users.get_mut(&user.id) else {
            return Ok(false);
        };
        stored.link = user.link.clone();
        stored.athletes = user.athletes.clone();
        stored.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: DbId) -> DbResult<bool> {
        let mut state = self.state.write().await;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        // Cascade owned rows, then drop every reference to the user.
        state.blocks.retain(|_, b| b.owner_id != id);
        state.progress.retain(|(user_id, _), _| *user_id != id);
        for user in state.users.values_mut() {
            if user.link.coach_id == Some(id) {
                user.link.coach_id = None;
            }
            user.link.coach_requests.retain(|r| r.coach_id != id);
            user.athletes.retain(|&a| a != id);
        }
        Ok(true)
    }

    async fn count_by_role(&self, role: Role) -> DbResult<i64> {
        let state = self.state.read().await;
        Ok(state.users.values().filter(|u| u.role == role).count() as i64)
    }
}

#[async_trait]
impl BlockRepository for MemoryStore {
    async fn create(&self, input: &CreateBlock) -> DbResult<TrainingBlock> {
        let mut state = self.state.write().await;
        state.next_block_id += 1;
        let now = Utc::now();
        let block = TrainingBlock {
            id: state.next_block_id,
            owner_id: input.owner_id,
            title: input.title.clone(),
            source: input.source,
            assigned_by: input.assigned_by.clone(),
            start_date: input.start_date,
            weeks: input.weeks.clone(),
            created_at: now,
            updated_at: now,
        };
        state.blocks.insert(block.id, block.clone());
        Ok(block)
    }

    async fn find_by_id(&self, id: DbId) -> DbResult<Option<TrainingBlock>> {
        Ok(self.state.read().await.blocks.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: DbId) -> DbResult<Vec<TrainingBlock>> {
        let state = self.state.read().await;
        Ok(state
            .blocks
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn save(&self, block: &TrainingBlock) -> DbResult<Option<TrainingBlock>> {
        let mut state = self.state.write().await;
        let Some(stored) = state.blocks.get_mut(&block.id) else {
            return Ok(None);
        };
        stored.title = block.title.clone();
        stored.source = block.source;
        stored.assigned_by = block.assigned_by.clone();
        stored.start_date = block.start_date;
        stored.weeks = block.weeks.clone();
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: DbId) -> DbResult<bool> {
        Ok(self.state.write().await.blocks.remove(&id).is_some())
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.state.read().await.blocks.len() as i64)
    }
}

#[async_trait]
impl ProgressRepository for MemoryStore {
    async fn list_by_user(&self, user_id: DbId) -> DbResult<Vec<ProgressRecord>> {
        let state = self.state.read().await;
        Ok(state
            .progress
            .iter()
            .filter(|((owner, _), _)| *owner == user_id)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn count_records(&self) -> DbResult<i64> {
        Ok(self.state.read().await.progress.len() as i64)
    }
}

#[async_trait]
impl WorkoutRepository for MemoryStore {
    async fn complete_day(
        &self,
        owner_id: DbId,
        day_id: &str,
        submission: &DaySubmission,
        lifts: &[LiftSummary],
        today: CalendarDate,
    ) -> DbResult<Option<CompletedDay>> {
        let mut state = self.state.write().await;

        let mut completed = None;
        for block in state.blocks.values_mut().filter(|b| b.owner_id == owner_id) {
            if let Some(day) = find_day_mut(&mut block.weeks, day_id) {
                day.apply_submission(submission);
                completed = Some(CompletedDay {
                    block_id: block.id,
                    day: day.clone(),
                });
                block.updated_at = Utc::now();
                break;
            }
        }

        if completed.is_some() {
            for lift in lifts.iter().filter(|l| l.is_trackable()) {
                state
                    .progress
                    .entry((owner_id, lift.exercise_name.clone()))
                    .or_insert_with(|| ProgressRecord::new(owner_id, lift.exercise_name.clone()))
                    .merge(today, lift);
            }
        }
        Ok(completed)
    }
}
