/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (invoice due dates, expense dates, campaign flights).
pub type Date = chrono::NaiveDate;

/// Billed money is stored as integer cents.
pub type Cents = i64;
