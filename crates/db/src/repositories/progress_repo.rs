//! Postgres repository for the `progress_entries` table.
//!
//! Each row is one dated entry; a [`ProgressRecord`] is the group of rows
//! sharing `(user_id, exercise_name)`.

use async_trait::async_trait;
use sqlx::FromRow;
use totalgrind_core::progress::{ProgressEntry, ProgressRecord};
use totalgrind_core::types::{CalendarDate, DbId};

use super::{PgStore, ProgressRepository};
use crate::error::DbResult;

#[derive(Debug, FromRow)]
pub(super) struct EntryRow {
    user_id: DbId,
    exercise_name: String,
    entry_date: CalendarDate,
    estimated_max: f64,
    actual_max: f64,
}

/// Fold rows ordered by (exercise_name, entry_date) into records.
pub(super) fn group_entries(rows: Vec<EntryRow>) -> Vec<ProgressRecord> {
    let mut records: Vec<ProgressRecord> = Vec::new();
    for row in rows {
        let entry = ProgressEntry {
            date: row.entry_date,
            estimated_max: row.estimated_max,
            actual_max: row.actual_max,
        };
        match records.last_mut() {
            Some(record)
                if record.user_id == row.user_id && record.exercise_name == row.exercise_name =>
            {
                record.history.push(entry);
            }
            _ => {
                let mut record = ProgressRecord::new(row.user_id, row.exercise_name);
                record.history.push(entry);
                records.push(record);
            }
        }
    }
    records
}

#[async_trait]
impl ProgressRepository for PgStore {
    async fn list_by_user(&self, user_id: DbId) -> DbResult<Vec<ProgressRecord>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            "SELECT user_id, exercise_name, entry_date, estimated_max, actual_max
             FROM progress_entries
             WHERE user_id = $1
             ORDER BY exercise_name, entry_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(group_entries(rows))
    }

    async fn count_records(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM (
                SELECT DISTINCT user_id, exercise_name FROM progress_entries
             ) AS records",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
