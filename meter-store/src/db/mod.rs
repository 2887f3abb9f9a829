mod meter_queries;
mod reading_queries;
mod schema;

use std::{str::FromStr, time::Duration};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use time::OffsetDateTime;

use crate::{
    domain::{DeletedMeter, Meter, MeterId, Reading},
    error::StoreError,
};

/// Persistence operations over meters and their readings.
///
/// Every method is a single atomic unit. Lookups of an id that does not exist
/// resolve to `Ok(None)`; `Err` is reserved for backend failures.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn create_meter(&self, label: &str) -> Result<Meter, StoreError>;

    async fn get_meter(&self, id: MeterId) -> Result<Option<Meter>, StoreError>;

    /// All meters ordered by id.
    async fn list_meters(&self) -> Result<Vec<Meter>, StoreError>;

    async fn update_meter(&self, id: MeterId, label: &str) -> Result<Option<Meter>, StoreError>;

    /// Remove the meter together with every reading it owns.
    async fn delete_meter(&self, id: MeterId) -> Result<Option<DeletedMeter>, StoreError>;

    /// Append a reading and return it alongside its owning meter.
    async fn add_reading(
        &self,
        meter_id: MeterId,
        timestamp: OffsetDateTime,
        value: f64,
    ) -> Result<Option<(Meter, Reading)>, StoreError>;

    /// Readings of one meter, most recent first.
    async fn list_readings(&self, meter_id: MeterId) -> Result<Vec<Reading>, StoreError>;
}

/// SQLite-backed [`Store`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and make sure the schema exists.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        busy_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// A private in-memory database. It lives on a single pooled connection
    /// that is never recycled, since closing it would drop the data.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        schema::ensure(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    async fn create_meter(&self, label: &str) -> Result<Meter, StoreError> {
        let meter = meter_queries::insert(&self.pool, label).await?;
        tracing::debug!(meter_id = meter.id, "meter row inserted");
        Ok(meter)
    }

    async fn get_meter(&self, id: MeterId) -> Result<Option<Meter>, StoreError> {
        Ok(meter_queries::find(&self.pool, id).await?)
    }

    async fn list_meters(&self) -> Result<Vec<Meter>, StoreError> {
        Ok(meter_queries::all(&self.pool).await?)
    }

    async fn update_meter(&self, id: MeterId, label: &str) -> Result<Option<Meter>, StoreError> {
        Ok(meter_queries::relabel(&self.pool, id, label).await?)
    }

    async fn delete_meter(&self, id: MeterId) -> Result<Option<DeletedMeter>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let readings_removed = reading_queries::delete_for_meter(&mut *tx, id).await?;
        let Some(meter) = meter_queries::delete(&mut *tx, id).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        tx.commit().await?;
        tracing::debug!(meter_id = id, readings_removed, "meter rows deleted");

        Ok(Some(DeletedMeter {
            meter,
            readings_removed,
        }))
    }

    async fn add_reading(
        &self,
        meter_id: MeterId,
        timestamp: OffsetDateTime,
        value: f64,
    ) -> Result<Option<(Meter, Reading)>, StoreError> {
        let timestamp = reading_queries::encode_timestamp(timestamp)?;
        let mut tx = self.pool.begin().await?;

        // The insert goes first so the transaction holds the write lock
        // before it reads anything back.
        let Some(row) =
            reading_queries::insert_for_existing_meter(&mut *tx, meter_id, timestamp, value)
                .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };
        let Some(meter) = meter_queries::find(&mut *tx, meter_id).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        tx.commit().await?;

        Ok(Some((meter, Reading::try_from(row)?)))
    }

    async fn list_readings(&self, meter_id: MeterId) -> Result<Vec<Reading>, StoreError> {
        reading_queries::for_meter(&self.pool, meter_id)
            .await?
            .into_iter()
            .map(Reading::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use time::macros::datetime;
    use tokio::sync::Barrier;

    async fn store() -> SqliteStore {
        SqliteStore::in_memory().await.expect("in-memory store")
    }

    async fn orphan_count(store: &SqliteStore) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM meter_data WHERE meter_id NOT IN (SELECT id FROM meter)",
        )
        .fetch_one(store.pool())
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn created_meter_round_trips_with_no_readings() {
        let store = store().await;

        let created = store.create_meter("Kitchen").await.unwrap();
        let fetched = store.get_meter(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.label, "Kitchen");
        assert_eq!(fetched, created);
        assert!(store.list_readings(created.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_ids_resolve_to_none() {
        let store = store().await;

        assert!(store.get_meter(42).await.unwrap().is_none());
        assert!(store.update_meter(42, "x").await.unwrap().is_none());
        assert!(store.delete_meter(42).await.unwrap().is_none());
        assert!(store
            .add_reading(42, datetime!(2024-01-01 00:00:00 UTC), 1.0)
            .await
            .unwrap()
            .is_none());
        assert_eq!(orphan_count(&store).await, 0);
    }

    #[tokio::test]
    async fn readings_come_back_most_recent_first() {
        let store = store().await;
        let garage = store.create_meter("Garage").await.unwrap();
        assert_eq!(garage.id, 1);

        let (_, first) = store
            .add_reading(garage.id, datetime!(2024-03-01 10:00:00 UTC), 42.5)
            .await
            .unwrap()
            .unwrap();
        let (meter, second) = store
            .add_reading(garage.id, datetime!(2024-03-01 10:05:00 UTC), 10.0)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(meter, garage);
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let readings = store.list_readings(garage.id).await.unwrap();
        let ids_and_values: Vec<_> = readings.iter().map(|r| (r.id, r.value)).collect();
        assert_eq!(ids_and_values, vec![(2, 10.0), (1, 42.5)]);
        assert_eq!(readings[1].timestamp, datetime!(2024-03-01 10:00:00 UTC));
    }

    #[tokio::test]
    async fn timestamp_ties_are_broken_by_id() {
        let store = store().await;
        let meter = store.create_meter("Boiler").await.unwrap();
        let ts = datetime!(2024-05-05 12:00:00.123456789 UTC);

        for value in [1.0, 2.0, 3.0] {
            store.add_reading(meter.id, ts, value).await.unwrap();
        }

        let first = store.list_readings(meter.id).await.unwrap();
        let again = store.list_readings(meter.id).await.unwrap();

        let values: Vec<_> = first.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![3.0, 2.0, 1.0]);
        assert_eq!(first, again);
        assert!(first.iter().all(|r| r.timestamp == ts));
    }

    #[tokio::test]
    async fn delete_cascades_to_readings() {
        let store = store().await;
        let meter = store.create_meter("Garage").await.unwrap();
        let other = store.create_meter("Shed").await.unwrap();
        let ts = datetime!(2024-01-01 00:00:00 UTC);

        store.add_reading(meter.id, ts, 1.0).await.unwrap();
        store.add_reading(meter.id, ts, 2.0).await.unwrap();
        store.add_reading(other.id, ts, 3.0).await.unwrap();

        let deleted = store.delete_meter(meter.id).await.unwrap().unwrap();
        assert_eq!(deleted.meter, meter);
        assert_eq!(deleted.readings_removed, 2);

        assert!(store.list_readings(meter.id).await.unwrap().is_empty());
        assert_eq!(store.list_meters().await.unwrap(), vec![other.clone()]);
        assert_eq!(store.list_readings(other.id).await.unwrap().len(), 1);
        assert_eq!(orphan_count(&store).await, 0);
    }

    #[tokio::test]
    async fn update_changes_label_but_not_id() {
        let store = store().await;
        let meter = store.create_meter("Old").await.unwrap();

        let updated = store.update_meter(meter.id, "New").await.unwrap().unwrap();

        assert_eq!(updated.id, meter.id);
        assert_eq!(updated.label, "New");
        assert_eq!(store.get_meter(meter.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn listing_is_stable_without_mutation() {
        let store = store().await;
        for label in ["a", "b", "c"] {
            store.create_meter(label).await.unwrap();
        }

        let first = store.list_meters().await.unwrap();
        let second = store.list_meters().await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    /// Runs on a file database with several pooled connections so the
    /// writers contend inside SQLite rather than queueing on one connection.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_delete_and_insert_leave_no_orphans() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("meters.sqlite3").display());
        let store = SqliteStore::connect(&url, 4, Duration::from_secs(10))
            .await
            .unwrap();
        let ts = datetime!(2024-01-01 00:00:00 UTC);

        for round in 0..20 {
            let meter = store.create_meter("Racy").await.unwrap();
            let barrier = Arc::new(Barrier::new(4));

            let inserters: Vec<_> = (0..3)
                .map(|i| {
                    let store = store.clone();
                    let barrier = barrier.clone();
                    tokio::spawn(async move {
                        barrier.wait().await;
                        store.add_reading(meter.id, ts, f64::from(i)).await
                    })
                })
                .collect();
            let deleter = {
                let store = store.clone();
                let barrier = barrier.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    store.delete_meter(meter.id).await
                })
            };

            let mut landed = 0;
            for inserter in inserters {
                if inserter.await.unwrap().unwrap().is_some() {
                    landed += 1;
                }
            }
            let deleted = deleter.await.unwrap().unwrap().unwrap();

            // Every insert that found the meter was swept up by the delete.
            assert_eq!(deleted.readings_removed, landed, "round {round}");
            assert!(store.list_readings(meter.id).await.unwrap().is_empty());
            assert_eq!(orphan_count(&store).await, 0);
        }
    }
}
