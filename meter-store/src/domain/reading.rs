use time::OffsetDateTime;

use super::meter::MeterId;

pub type ReadingId = i64;

/// One timestamped observation of a meter. Never updated after insert.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reading {
    pub id: ReadingId,
    pub meter_id: MeterId,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
    pub value: f64,
}
