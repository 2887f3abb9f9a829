pub mod meters;
pub mod readings;

use axum::http::StatusCode;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Page region that receives the rendered fragment of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    PushedContent,
    ReadingsPartial,
}

impl Target {
    pub fn selector(self) -> &'static str {
        match self {
            Self::PushedContent => "#pushedContent",
            Self::ReadingsPartial => "#meter_data_partial",
        }
    }
}

/// User-facing notification of a completed mutation, plus where the client
/// should put the result and which path it should record in its history.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub message: String,
    pub target: Target,
    pub push: String,
}

/// What a handler produced, before any rendering decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<V> {
    pub status: StatusCode,
    pub view: V,
    pub event: Option<Event>,
}

impl<V> Outcome<V> {
    pub fn ok(view: V) -> Self {
        Self {
            status: StatusCode::OK,
            view,
            event: None,
        }
    }

    pub fn with_event(status: StatusCode, view: V, event: Event) -> Self {
        Self {
            status,
            view,
            event: Some(event),
        }
    }
}

pub(crate) fn event_time(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.to_string())
}

pub(crate) fn meter_path(id: meter_store::MeterId) -> String {
    format!("/meter/{id}")
}
