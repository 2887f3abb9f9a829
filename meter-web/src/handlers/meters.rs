use axum::http::StatusCode;
use meter_store::{MeterId, Store};
use time::OffsetDateTime;

use super::{event_time, meter_path, Event, Outcome, Target};
use crate::{
    error::HandlerError,
    input::{CreateMeterForm, UpdateMeterForm},
    views::{DeleteConfirmation, Landing, MeterDetail, MeterForm, MeterList},
};

pub async fn index() -> Result<Outcome<Landing>, HandlerError> {
    Ok(Outcome::ok(Landing))
}

pub async fn list_meters(store: &dyn Store) -> Result<Outcome<MeterList>, HandlerError> {
    let meters = store.list_meters().await?;
    Ok(Outcome::ok(MeterList { meters }))
}

pub async fn get_meter(store: &dyn Store, id: MeterId) -> Result<Outcome<MeterDetail>, HandlerError> {
    let meter = store
        .get_meter(id)
        .await?
        .ok_or(HandlerError::MeterNotFound(id))?;
    let readings = store.list_readings(id).await?;

    Ok(Outcome::ok(MeterDetail { meter, readings }))
}

pub async fn create_form() -> Result<Outcome<MeterForm>, HandlerError> {
    Ok(Outcome::ok(MeterForm { meter: None }))
}

pub async fn create_meter(
    store: &dyn Store,
    input: CreateMeterForm,
) -> Result<Outcome<MeterDetail>, HandlerError> {
    let label = input.validate()?;

    let meter = store.create_meter(label.as_str()).await?;
    metrics::counter!("meters_created_total").increment(1);
    tracing::info!(meter_id = meter.id, label = %meter.label, "meter created");

    let event = Event {
        message: format!(
            "Meter {} was successfully CREATED at {} with id {}",
            meter.label,
            event_time(OffsetDateTime::now_utc()),
            meter.id
        ),
        target: Target::PushedContent,
        push: meter_path(meter.id),
    };
    let view = MeterDetail {
        meter,
        readings: Vec::new(),
    };

    Ok(Outcome::with_event(StatusCode::CREATED, view, event))
}

pub async fn update_form(store: &dyn Store, id: MeterId) -> Result<Outcome<MeterForm>, HandlerError> {
    let meter = store
        .get_meter(id)
        .await?
        .ok_or(HandlerError::MeterNotFound(id))?;

    Ok(Outcome::ok(MeterForm { meter: Some(meter) }))
}

pub async fn update_meter(
    store: &dyn Store,
    id: MeterId,
    input: UpdateMeterForm,
) -> Result<Outcome<MeterDetail>, HandlerError> {
    let label = input.validate()?;

    let meter = store
        .update_meter(id, label.as_str())
        .await?
        .ok_or(HandlerError::MeterNotFound(id))?;
    metrics::counter!("meters_updated_total").increment(1);
    tracing::info!(meter_id = meter.id, label = %meter.label, "meter updated");

    let readings = store.list_readings(id).await?;
    let event = Event {
        message: format!(
            "Meter {} was successfully UPDATED at {} with id {}",
            meter.label,
            event_time(OffsetDateTime::now_utc()),
            meter.id
        ),
        target: Target::PushedContent,
        push: meter_path(meter.id),
    };

    Ok(Outcome::with_event(
        StatusCode::CREATED,
        MeterDetail { meter, readings },
        event,
    ))
}

pub async fn delete_confirmation(
    store: &dyn Store,
    id: MeterId,
) -> Result<Outcome<DeleteConfirmation>, HandlerError> {
    let meter = store
        .get_meter(id)
        .await?
        .ok_or(HandlerError::MeterNotFound(id))?;

    Ok(Outcome::ok(DeleteConfirmation { meter }))
}

pub async fn delete_meter(store: &dyn Store, id: MeterId) -> Result<Outcome<MeterList>, HandlerError> {
    let deleted = store
        .delete_meter(id)
        .await?
        .ok_or(HandlerError::MeterNotFound(id))?;
    metrics::counter!("meters_deleted_total").increment(1);
    tracing::info!(
        meter_id = deleted.meter.id,
        readings_removed = deleted.readings_removed,
        "meter deleted"
    );

    let meters = store.list_meters().await?;
    let event = Event {
        message: format!(
            "Meter {} was successfully DELETED at {} with id {}",
            deleted.meter.label,
            event_time(OffsetDateTime::now_utc()),
            deleted.meter.id
        ),
        target: Target::PushedContent,
        push: "/meters".to_string(),
    };

    Ok(Outcome::with_event(StatusCode::FOUND, MeterList { meters }, event))
}
