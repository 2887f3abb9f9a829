use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, State,
    },
    response::Response,
    routing::get,
    Form, Router,
};
use meter_store::{MeterId, Store};

use crate::{
    compose::{respond, RenderMode},
    error::HandlerError,
    handlers::{meters, readings},
    input::{AddReadingForm, CreateMeterForm, UpdateMeterForm, ValidationError},
};

/// Shared handle passed to every route. The store is the only state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new<S: Store + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/meters", get(meter_list))
        .route("/meter/:id", get(meter_detail))
        .route("/meters/create", get(meter_create_form).post(meter_create))
        .route("/meter/:id/delete", get(meter_delete_confirm).delete(meter_delete))
        .route("/meter/:id/update", get(meter_update_form).put(meter_update))
        .route(
            "/meter/:id/data/create",
            get(meter_data_create_form).post(meter_data_create),
        )
        .with_state(state)
}

type IdPath = Result<Path<MeterId>, PathRejection>;
type FormBody<T> = Result<Form<T>, FormRejection>;

/// An id segment that is not an integer names no meter.
fn meter_id(path: IdPath) -> Result<MeterId, HandlerError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| HandlerError::InvalidMeterId(rejection.body_text()))
}

fn form_input<T>(form: FormBody<T>) -> Result<T, HandlerError> {
    form.map(|Form(input)| input)
        .map_err(|rejection| ValidationError::Malformed(rejection.body_text()).into())
}

async fn index(mode: RenderMode) -> Response {
    respond(mode, meters::index().await)
}

async fn meter_list(State(state): State<AppState>, mode: RenderMode) -> Response {
    respond(mode, meters::list_meters(state.store.as_ref()).await)
}

async fn meter_detail(State(state): State<AppState>, path: IdPath, mode: RenderMode) -> Response {
    let result = async { meters::get_meter(state.store.as_ref(), meter_id(path)?).await };
    respond(mode, result.await)
}

async fn meter_create_form(mode: RenderMode) -> Response {
    respond(mode, meters::create_form().await)
}

async fn meter_create(
    State(state): State<AppState>,
    mode: RenderMode,
    form: FormBody<CreateMeterForm>,
) -> Response {
    let result = async { meters::create_meter(state.store.as_ref(), form_input(form)?).await };
    respond(mode, result.await)
}

async fn meter_delete_confirm(
    State(state): State<AppState>,
    path: IdPath,
    mode: RenderMode,
) -> Response {
    let result = async { meters::delete_confirmation(state.store.as_ref(), meter_id(path)?).await };
    respond(mode, result.await)
}

async fn meter_delete(State(state): State<AppState>, path: IdPath, mode: RenderMode) -> Response {
    let result = async { meters::delete_meter(state.store.as_ref(), meter_id(path)?).await };
    respond(mode, result.await)
}

async fn meter_update_form(
    State(state): State<AppState>,
    path: IdPath,
    mode: RenderMode,
) -> Response {
    let result = async { meters::update_form(state.store.as_ref(), meter_id(path)?).await };
    respond(mode, result.await)
}

async fn meter_update(
    State(state): State<AppState>,
    path: IdPath,
    mode: RenderMode,
    form: FormBody<UpdateMeterForm>,
) -> Response {
    let result = async {
        let id = meter_id(path)?;
        meters::update_meter(state.store.as_ref(), id, form_input(form)?).await
    };
    respond(mode, result.await)
}

async fn meter_data_create_form(
    State(state): State<AppState>,
    path: IdPath,
    mode: RenderMode,
) -> Response {
    let result = async { readings::reading_form(state.store.as_ref(), meter_id(path)?).await };
    respond(mode, result.await)
}

async fn meter_data_create(
    State(state): State<AppState>,
    path: IdPath,
    mode: RenderMode,
    form: FormBody<AddReadingForm>,
) -> Response {
    let result = async {
        let id = meter_id(path)?;
        readings::add_reading(state.store.as_ref(), id, form_input(form)?).await
    };
    respond(mode, result.await)
}
