pub type MeterId = i64;

/// A labelled utility meter. Its readings live in `meter_data` and are only
/// ever reached through the meter's id.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Meter {
    pub id: MeterId,
    pub label: String,
}

/// Result of a cascade delete: the meter as it was, plus how many of its
/// readings went with it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedMeter {
    pub meter: Meter,
    pub readings_removed: u64,
}
