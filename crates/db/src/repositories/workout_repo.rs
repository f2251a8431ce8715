//! Day completion against Postgres: one transaction covering the block write
//! and the progress upserts.

use async_trait::async_trait;
use sqlx::types::Json;
use totalgrind_core::progress::LiftSummary;
use totalgrind_core::training::{find_day_mut, DaySubmission};
use totalgrind_core::types::{CalendarDate, DbId};

use super::block_repo::{BlockRow, COLUMNS};
use super::{PgStore, WorkoutRepository};
use crate::error::DbResult;
use crate::models::block::{CompletedDay, TrainingBlock};

#[async_trait]
impl WorkoutRepository for PgStore {
    async fn complete_day(
        &self,
        owner_id: DbId,
        day_id: &str,
        submission: &DaySubmission,
        lifts: &[LiftSummary],
        today: CalendarDate,
    ) -> DbResult<Option<CompletedDay>> {
        let mut tx = self.pool.begin().await?;

        // Row locks serialize concurrent completions for the same owner.
        let query = format!(
            "SELECT {COLUMNS} FROM training_blocks WHERE owner_id = $1 ORDER BY id FOR UPDATE"
        );
        let rows = sqlx::query_as::<_, BlockRow>(&query)
            .bind(owner_id)
            .fetch_all(&mut *tx)
            .await?;

        let mut target = None;
        for row in rows {
            let mut block = TrainingBlock::try_from(row)?;
            let completed = find_day_mut(&mut block.weeks, day_id).map(|day| {
                day.apply_submission(submission);
                day.clone()
            });
            if let Some(day) = completed {
                target = Some((block, day));
                break;
            }
        }

        let Some((block, day)) = target else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE training_blocks SET weeks = $2, updated_at = NOW() WHERE id = $1")
            .bind(block.id)
            .bind(Json(&block.weeks))
            .execute(&mut *tx)
            .await?;

        for lift in lifts.iter().filter(|l| l.is_trackable()) {
            sqlx::query(
                "INSERT INTO progress_entries (user_id, exercise_name, entry_date, estimated_max, actual_max)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (user_id, exercise_name, entry_date) DO UPDATE SET
                    estimated_max = GREATEST(progress_entries.estimated_max, EXCLUDED.estimated_max),
                    actual_max = GREATEST(progress_entries.actual_max, EXCLUDED.actual_max),
                    updated_at = NOW()",
            )
            .bind(owner_id)
            .bind(&lift.exercise_name)
            .bind(today)
            .bind(lift.best_e1rm)
            .bind(lift.actual_max)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            owner_id,
            block_id = block.id,
            day_id,
            lifts = lifts.len(),
            "Day completed"
        );

        Ok(Some(CompletedDay {
            block_id: block.id,
            day,
        }))
    }
}
