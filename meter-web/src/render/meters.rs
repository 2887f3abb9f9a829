use std::fmt::Write;

use super::{escape, readings::readings_region, Render};
use crate::views::{DeleteConfirmation, Landing, MeterDetail, MeterForm, MeterList};

impl Render for Landing {
    fn title(&self) -> String {
        "Utility meters".to_string()
    }

    fn fragment(&self) -> String {
        r##"<section>
  <h1>Utility meters</h1>
  <p>Track readings for every meter you own.</p>
  <a href="/meters" hx-get="/meters" hx-target="#pushedContent" hx-push-url="true">Show meters</a>
</section>"##
            .to_string()
    }
}

impl Render for MeterList {
    fn title(&self) -> String {
        "Meters".to_string()
    }

    fn fragment(&self) -> String {
        let mut html = String::from(
            r##"<section id="meters_list">
  <h1>Meters</h1>
  <button hx-get="/meters/create" hx-target="#pushedContent">New meter</button>
"##,
        );

        if self.meters.is_empty() {
            html.push_str("  <p>No meters yet.</p>\n");
        } else {
            html.push_str("  <table>\n    <thead><tr><th>Id</th><th>Label</th></tr></thead>\n    <tbody>\n");
            for meter in &self.meters {
                let _ = writeln!(
                    html,
                    r##"      <tr><td>{id}</td><td><a href="/meter/{id}" hx-get="/meter/{id}" hx-target="#pushedContent" hx-push-url="true">{label}</a></td></tr>"##,
                    id = meter.id,
                    label = escape(&meter.label),
                );
            }
            html.push_str("    </tbody>\n  </table>\n");
        }

        html.push_str("</section>");
        html
    }
}

impl Render for MeterDetail {
    fn title(&self) -> String {
        format!("Meter {}", self.meter.label)
    }

    fn fragment(&self) -> String {
        let id = self.meter.id;
        format!(
            r##"<section id="meter_details" data-meter-id="{id}">
  <h1>{label}</h1>
  <button hx-get="/meter/{id}/update" hx-target="#pushedContent">Edit</button>
  <button hx-get="/meter/{id}/delete" hx-target="#pushedContent">Delete</button>
  <button hx-get="/meter/{id}/data/create" hx-target="#reading_form">Add reading</button>
  <div id="reading_form"></div>
  <div id="meter_data_partial">
{readings}
  </div>
</section>"##,
            label = escape(&self.meter.label),
            readings = readings_region(&self.readings),
        )
    }
}

impl Render for MeterForm {
    fn title(&self) -> String {
        match &self.meter {
            Some(meter) => format!("Edit meter {}", meter.label),
            None => "New meter".to_string(),
        }
    }

    fn fragment(&self) -> String {
        match &self.meter {
            None => r##"<form hx-post="/meters/create" hx-target="#pushedContent">
  <label>Label <input type="text" name="label" required></label>
  <button type="submit">Create</button>
</form>"##
                .to_string(),
            Some(meter) => format!(
                r##"<form hx-put="/meter/{id}/update" hx-target="#pushedContent">
  <input type="hidden" name="id" value="{id}">
  <label>Label <input type="text" name="label" value="{label}" required></label>
  <button type="submit">Save</button>
</form>"##,
                id = meter.id,
                label = escape(&meter.label),
            ),
        }
    }
}

impl Render for DeleteConfirmation {
    fn title(&self) -> String {
        format!("Delete meter {}", self.meter.label)
    }

    fn fragment(&self) -> String {
        format!(
            r##"<section>
  <p>Delete meter <strong>{label}</strong> and all of its readings?</p>
  <button hx-delete="/meter/{id}/delete" hx-target="#pushedContent">Delete</button>
  <a href="/meter/{id}" hx-get="/meter/{id}" hx-target="#pushedContent">Cancel</a>
</section>"##,
            id = self.meter.id,
            label = escape(&self.meter.label),
        )
    }
}
