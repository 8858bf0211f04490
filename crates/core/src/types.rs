/// All primary keys are PostgreSQL UUIDs generated by `uuid_generate_v4()`.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (`DATE` columns) carry no time zone.
pub type Date = chrono::NaiveDate;
