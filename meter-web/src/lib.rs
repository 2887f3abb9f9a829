pub mod compose;
pub mod config;
pub mod error;
pub mod handlers;
pub mod input;
pub mod metrics_server;
pub mod observability;
pub mod render;
pub mod routes;
pub mod views;

pub use error::HandlerError;
pub use routes::{router, AppState};
