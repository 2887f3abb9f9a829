pub mod meter;
pub mod reading;

pub use meter::{DeletedMeter, Meter, MeterId};
pub use reading::{Reading, ReadingId};
