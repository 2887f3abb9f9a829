use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use meter_store::{MeterId, StoreError};

use crate::{input::ValidationError, render};

#[derive(thiserror::Error, Debug)]
pub enum HandlerError {
    #[error("meter {0} not found")]
    MeterNotFound(MeterId),
    #[error("meter not found: {0}")]
    InvalidMeterId(String),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MeterNotFound(_) | Self::InvalidMeterId(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the client. Backend details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Store(_) => "The request could not be completed.".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Html(render::error_fragment(status, &self.public_message()))).into_response()
    }
}
