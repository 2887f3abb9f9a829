use sqlx::SqlitePool;

const CREATE_METER: &str = r#"
    CREATE TABLE IF NOT EXISTS meter (
        id    INTEGER PRIMARY KEY AUTOINCREMENT,
        label TEXT    NOT NULL
    )
"#;

// `timestamp` holds UTC Unix-epoch nanoseconds.
const CREATE_METER_DATA: &str = r#"
    CREATE TABLE IF NOT EXISTS meter_data (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        meter_id  INTEGER NOT NULL REFERENCES meter(id) ON DELETE CASCADE,
        timestamp INTEGER NOT NULL,
        value     REAL    NOT NULL
    )
"#;

const CREATE_METER_DATA_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS meter_data_meter_ts
        ON meter_data (meter_id, timestamp)
"#;

/// Create the `meter` and `meter_data` tables if they are missing.
pub(crate) async fn ensure(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in [CREATE_METER, CREATE_METER_DATA, CREATE_METER_DATA_INDEX] {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
