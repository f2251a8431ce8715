/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar day without a time zone (serialized as `yyyy-mm-dd`).
pub type CalendarDate = chrono::NaiveDate;
