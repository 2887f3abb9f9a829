pub mod db;
pub mod domain;
pub mod error;

pub use db::{SqliteStore, Store};
pub use domain::{DeletedMeter, Meter, MeterId, Reading, ReadingId};
pub use error::StoreError;
