use axum::http::StatusCode;
use meter_store::{MeterId, Store};
use time::OffsetDateTime;

use super::{event_time, meter_path, Event, Outcome, Target};
use crate::{
    error::HandlerError,
    input::AddReadingForm,
    views::{MeterReadings, ReadingForm},
};

pub async fn reading_form(
    store: &dyn Store,
    meter_id: MeterId,
) -> Result<Outcome<ReadingForm>, HandlerError> {
    let meter = store
        .get_meter(meter_id)
        .await?
        .ok_or(HandlerError::MeterNotFound(meter_id))?;

    Ok(Outcome::ok(ReadingForm { meter }))
}

/// Append a reading stamped with the current UTC time. Only the readings
/// region of the meter page is refreshed.
pub async fn add_reading(
    store: &dyn Store,
    meter_id: MeterId,
    input: AddReadingForm,
) -> Result<Outcome<MeterReadings>, HandlerError> {
    let value = input.validate()?;

    let (meter, added) = store
        .add_reading(meter_id, OffsetDateTime::now_utc(), value.get())
        .await?
        .ok_or(HandlerError::MeterNotFound(meter_id))?;
    metrics::counter!("readings_created_total").increment(1);
    tracing::info!(meter_id, reading_id = added.id, value = added.value, "reading created");

    let readings = store.list_readings(meter_id).await?;
    let event = Event {
        message: format!(
            "Meter Data for {} was successfully CREATED at {} with id {} with a value of {:?}",
            meter.label,
            event_time(added.timestamp),
            added.id,
            added.value
        ),
        target: Target::ReadingsPartial,
        push: meter_path(meter_id),
    };

    Ok(Outcome::with_event(
        StatusCode::CREATED,
        MeterReadings {
            meter,
            added,
            readings,
        },
        event,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_store::SqliteStore;

    fn value(raw: &str) -> AddReadingForm {
        AddReadingForm {
            value: Some(raw.to_string()),
        }
    }

    #[tokio::test]
    async fn readings_are_listed_newest_first() {
        let store = SqliteStore::in_memory().await.unwrap();
        let garage = store.create_meter("Garage").await.unwrap();

        let first = add_reading(&store, garage.id, value("42.5")).await.unwrap();
        assert_eq!(first.status, StatusCode::CREATED);
        assert_eq!(first.view.added.id, 1);
        assert_eq!(first.view.added.value, 42.5);

        let second = add_reading(&store, garage.id, value("10.0")).await.unwrap();
        let listed: Vec<_> = second
            .view
            .readings
            .iter()
            .map(|r| (r.id, r.value))
            .collect();
        assert_eq!(listed, vec![(2, 10.0), (1, 42.5)]);

        let event = second.event.unwrap();
        assert_eq!(event.target, Target::ReadingsPartial);
        assert_eq!(event.push, format!("/meter/{}", garage.id));
        assert!(event
            .message
            .starts_with("Meter Data for Garage was successfully CREATED at "));
        assert!(event.message.ends_with("with id 2 with a value of 10.0"));
    }

    #[tokio::test]
    async fn unknown_meter_is_not_found() {
        let store = SqliteStore::in_memory().await.unwrap();

        let err = add_reading(&store, 3, value("1")).await.unwrap_err();
        assert!(matches!(err, HandlerError::MeterNotFound(3)));
        assert!(matches!(
            reading_form(&store, 3).await.unwrap_err(),
            HandlerError::MeterNotFound(3)
        ));
    }

    #[tokio::test]
    async fn non_numeric_value_is_rejected_without_insert() {
        let store = SqliteStore::in_memory().await.unwrap();
        let meter = store.create_meter("Pump").await.unwrap();

        for input in [AddReadingForm { value: None }, value("abc"), value("")] {
            let err = add_reading(&store, meter.id, input).await.unwrap_err();
            assert!(matches!(err, HandlerError::Validation(_)));
        }

        assert!(store.list_readings(meter.id).await.unwrap().is_empty());
    }
}
