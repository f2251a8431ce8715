//! Postgres repository for the `training_blocks` table.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::FromRow;
use totalgrind_core::training::{BlockSource, Week};
use totalgrind_core::types::{CalendarDate, DbId, Timestamp};

use super::{BlockRepository, PgStore};
use crate::error::{DbError, DbResult};
use crate::models::block::{CreateBlock, TrainingBlock};

/// Column list shared across queries to avoid repetition.
pub(super) const COLUMNS: &str =
    "id, owner_id, title, source, assigned_by, start_date, weeks, created_at, updated_at";

#[derive(Debug, FromRow)]
pub(super) struct BlockRow {
    id: DbId,
    owner_id: DbId,
    title: String,
    source: String,
    assigned_by: Option<String>,
    start_date: CalendarDate,
    weeks: Json<Vec<Week>>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TryFrom<BlockRow> for TrainingBlock {
    type Error = DbError;

    fn try_from(row: BlockRow) -> Result<Self, Self::Error> {
        let source: BlockSource = row.source.parse().map_err(|_| {
            DbError::Decode(format!("block {} has source '{}'", row.id, row.source))
        })?;
        Ok(TrainingBlock {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            source,
            assigned_by: row.assigned_by,
            start_date: row.start_date,
            weeks: row.weeks.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl BlockRepository for PgStore {
    async fn create(&self, input: &CreateBlock) -> DbResult<TrainingBlock> {
        let query = format!(
            "INSERT INTO training_blocks (owner_id, title, source, assigned_by, start_date, weeks)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockRow>(&query)
            .bind(input.owner_id)
            .bind(&input.title)
            .bind(input.source.as_str())
            .bind(&input.assigned_by)
            .bind(input.start_date)
            .bind(Json(&input.weeks))
            .fetch_one(&self.pool)
            .await?
            .try_into()
    }

    async fn find_by_id(&self, id: DbId) -> DbResult<Option<TrainingBlock>> {
        let query = format!("SELECT {COLUMNS} FROM training_blocks WHERE id = $1");
        sqlx::query_as::<_, BlockRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(TrainingBlock::try_from)
            .transpose()
    }

    async fn list_by_owner(&self, owner_id: DbId) -> DbResult<Vec<TrainingBlock>> {
        let query = format!("SELECT {COLUMNS} FROM training_blocks WHERE owner_id = $1 ORDER BY id");
        sqlx::query_as::<_, BlockRow>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(TrainingBlock::try_from)
            .collect()
    }

    async fn save(&self, block: &TrainingBlock) -> DbResult<Option<TrainingBlock>> {
        let query = format!(
            "UPDATE training_blocks SET
                title = $2,
                source = $3,
                assigned_by = $4,
                start_date = $5,
                weeks = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockRow>(&query)
            .bind(block.id)
            .bind(&block.title)
            .bind(block.source.as_str())
            .bind(&block.assigned_by)
            .bind(block.start_date)
            .bind(Json(&block.weeks))
            .fetch_optional(&self.pool)
            .await?
            .map(TrainingBlock::try_from)
            .transpose()
    }

    async fn delete(&self, id: DbId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM training_blocks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM training_blocks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
