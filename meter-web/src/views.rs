//! Data handed from the handlers to rendering. Each struct is exactly what
//! one page region needs; none of them know about markup.

use meter_store::{Meter, Reading};

#[derive(Debug, Clone, PartialEq)]
pub struct Landing;

#[derive(Debug, Clone, PartialEq)]
pub struct MeterList {
    pub meters: Vec<Meter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeterDetail {
    pub meter: Meter,
    pub readings: Vec<Reading>,
}

/// Result of appending a reading: the refreshed series plus the new entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterReadings {
    pub meter: Meter,
    pub added: Reading,
    pub readings: Vec<Reading>,
}

/// Create form when `meter` is `None`, edit form otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterForm {
    pub meter: Option<Meter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteConfirmation {
    pub meter: Meter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingForm {
    pub meter: Meter,
}
