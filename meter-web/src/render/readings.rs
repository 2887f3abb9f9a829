use std::fmt::Write;

use meter_store::Reading;

use super::{escape, Render};
use crate::{
    handlers::event_time,
    views::{MeterDetail, MeterReadings, ReadingForm},
};

/// Inner markup of `#meter_data_partial`: the readings table and the same
/// series as JSON for client-side charting.
pub(super) fn readings_region(readings: &[Reading]) -> String {
    let mut html = String::new();

    if readings.is_empty() {
        html.push_str("    <p>No readings yet.</p>\n");
    } else {
        html.push_str(
            "    <table>\n      <thead><tr><th>Id</th><th>Timestamp</th><th>Value</th></tr></thead>\n      <tbody>\n",
        );
        for reading in readings {
            let _ = writeln!(
                html,
                "        <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                reading.id,
                escape(&event_time(reading.timestamp)),
                reading.value,
            );
        }
        html.push_str("      </tbody>\n    </table>\n");
    }

    let _ = write!(
        html,
        r##"    <script type="application/json" id="meter_data_json">{}</script>"##,
        readings_json(readings)
    );
    html
}

fn readings_json(readings: &[Reading]) -> String {
    serde_json::to_string(readings)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

impl Render for MeterReadings {
    fn title(&self) -> String {
        format!("Meter {}", self.meter.label)
    }

    fn fragment(&self) -> String {
        readings_region(&self.readings)
    }

    fn page_content(&self) -> String {
        MeterDetail {
            meter: self.meter.clone(),
            readings: self.readings.clone(),
        }
        .fragment()
    }
}

impl Render for ReadingForm {
    fn title(&self) -> String {
        format!("New reading for {}", self.meter.label)
    }

    fn fragment(&self) -> String {
        format!(
            r##"<form hx-post="/meter/{id}/data/create" hx-target="#meter_data_partial">
  <label>Value for {label} <input type="number" step="any" name="value" required></label>
  <button type="submit">Add</button>
</form>"##,
            id = self.meter.id,
            label = escape(&self.meter.label),
        )
    }
}
