use sqlx::{Executor, Sqlite};
use time::OffsetDateTime;

use crate::{
    domain::{MeterId, Reading},
    error::StoreError,
};

/// Row shape of `meter_data`; the timestamp is kept as epoch nanoseconds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ReadingRow {
    pub id: i64,
    pub meter_id: i64,
    pub timestamp: i64,
    pub value: f64,
}

impl TryFrom<ReadingRow> for Reading {
    type Error = StoreError;

    fn try_from(row: ReadingRow) -> Result<Self, Self::Error> {
        let nanos = i128::from(row.timestamp);
        let timestamp = OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|_| StoreError::Timestamp(nanos))?;

        Ok(Reading {
            id: row.id,
            meter_id: row.meter_id,
            timestamp,
            value: row.value,
        })
    }
}

pub(crate) fn encode_timestamp(ts: OffsetDateTime) -> Result<i64, StoreError> {
    let nanos = ts.unix_timestamp_nanos();
    i64::try_from(nanos).map_err(|_| StoreError::Timestamp(nanos))
}

/// Insert a reading only if its meter exists. The existence check and the
/// insert are one statement, so a concurrent cascade delete cannot slip in
/// between them.
pub(crate) async fn insert_for_existing_meter<'e, E>(
    executor: E,
    meter_id: MeterId,
    timestamp: i64,
    value: f64,
) -> Result<Option<ReadingRow>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ReadingRow>(
        r#"
        INSERT INTO meter_data (meter_id, timestamp, value)
        SELECT id, ?, ?
        FROM meter
        WHERE id = ?
        RETURNING id, meter_id, timestamp, value
        "#,
    )
    .bind(timestamp)
    .bind(value)
    .bind(meter_id)
    .fetch_optional(executor)
    .await
}

/// Most recent first; `id` breaks timestamp ties so repeated reads agree.
pub(crate) async fn for_meter<'e, E>(
    executor: E,
    meter_id: MeterId,
) -> Result<Vec<ReadingRow>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ReadingRow>(
        r#"
        SELECT id, meter_id, timestamp, value
        FROM meter_data
        WHERE meter_id = ?
        ORDER BY timestamp DESC, id DESC
        "#,
    )
    .bind(meter_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn delete_for_meter<'e, E>(executor: E, meter_id: MeterId) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let done = sqlx::query(
        r#"
        DELETE FROM meter_data
        WHERE meter_id = ?
        "#,
    )
    .bind(meter_id)
    .execute(executor)
    .await?;

    Ok(done.rows_affected())
}
