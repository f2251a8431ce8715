//! Postgres repository for the `users` table.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::FromRow;
use totalgrind_core::coaching::{AthleteLink, CoachRequest};
use totalgrind_core::roles::Role;
use totalgrind_core::types::{DbId, Timestamp};

use super::{PgStore, UserRepository};
use crate::error::{DbError, DbResult};
use crate::models::user::{normalize_email, CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, name, role, coach_id, athletes, coach_requests, \
                        profile_picture, created_at, updated_at";

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, FromRow)]
struct UserRow {
    id: DbId,
    email: String,
    name: String,
    role: String,
    coach_id: Option<DbId>,
    athletes: Vec<DbId>,
    coach_requests: Json<Vec<CoachRequest>>,
    profile_picture: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| DbError::Decode(format!("user {} has role '{}'", row.id, row.role)))?;
        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            role,
            link: AthleteLink {
                coach_id: row.coach_id,
                coach_requests: row.coach_requests.0,
            },
            athletes: row.athletes,
            profile_picture: row.profile_picture,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_users(rows: Vec<UserRow>) -> DbResult<Vec<User>> {
    rows.into_iter().map(User::try_from).collect()
}

/// Surface unique violations as [`DbError::UniqueViolation`].
fn map_unique(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            return DbError::UniqueViolation(constraint);
        }
    }
    DbError::Sqlx(err)
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, input: &CreateUser) -> DbResult<User> {
        let query = format!(
            "INSERT INTO users (email, name, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(normalize_email(&input.email))
            .bind(&input.name)
            .bind(input.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique)?;
        row.try_into()
    }

    async fn find_by_id(&self, id: DbId) -> DbResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_many(&self, ids: &[DbId]) -> DbResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ANY($1) ORDER BY id");
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        into_users(rows)
    }

    async fn list(&self) -> DbResult<Vec<User>> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        into_users(rows)
    }

    async fn update(&self, id: DbId, input: &UpdateUser) -> DbResult<Option<User>> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.email.as_deref().map(normalize_email))
            .bind(input.role.map(Role::as_str))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique)?
            .map(User::try_from)
            .transpose()
    }

    async fn save_links(&self, user: &User) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET
                coach_id = $2,
                coach_requests = $3,
                athletes = $4,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(user.link.coach_id)
        .bind(Json(&user.link.coach_requests))
        .bind(&user.athletes)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: DbId) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        // `coach_id` is covered by ON DELETE SET NULL; rosters and pending
        // invitations are not foreign keys.
        sqlx::query(
            "UPDATE users SET
                coach_requests = COALESCE(
                    (SELECT jsonb_agg(r)
                       FROM jsonb_array_elements(coach_requests) AS r
                      WHERE (r->>'coachId')::bigint <> $1),
                    '[]'::jsonb),
                athletes = array_remove(athletes, $1),
                updated_at = NOW()
             WHERE id <> $1
               AND (coach_requests @> jsonb_build_array(jsonb_build_object('coachId', $1::bigint))
                    OR $1 = ANY(athletes))",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_role(&self, role: Role) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
