use serde::Deserialize;

/// Body of `POST /meters/create`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMeterForm {
    pub label: Option<String>,
}

/// Body of `PUT /meter/{id}/update`. The id comes from the path; an `id`
/// field in the form is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMeterForm {
    pub label: Option<String>,
}

/// Body of `POST /meter/{id}/data/create`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddReadingForm {
    pub value: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("malformed form body: {0}")]
    Malformed(String),
    #[error("{field} must be a number, got {raw:?}")]
    NotNumeric { field: &'static str, raw: String },
}

/// A trimmed, non-empty meter label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterLabel(String);

impl MeterLabel {
    pub fn parse(raw: Option<String>) -> Result<Self, ValidationError> {
        let raw = raw.ok_or(ValidationError::Missing("label"))?;
        let label = raw.trim();
        if label.is_empty() {
            return Err(ValidationError::Empty("label"));
        }
        Ok(Self(label.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A finite reading value. No range check beyond that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingValue(f64);

impl ReadingValue {
    pub fn parse(raw: Option<String>) -> Result<Self, ValidationError> {
        let raw = raw.ok_or(ValidationError::Missing("value"))?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty("value"));
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self(value)),
            _ => Err(ValidationError::NotNumeric {
                field: "value",
                raw: trimmed.to_string(),
            }),
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl CreateMeterForm {
    pub fn validate(self) -> Result<MeterLabel, ValidationError> {
        MeterLabel::parse(self.label)
    }
}

impl UpdateMeterForm {
    pub fn validate(self) -> Result<MeterLabel, ValidationError> {
        MeterLabel::parse(self.label)
    }
}

impl AddReadingForm {
    pub fn validate(self) -> Result<ReadingValue, ValidationError> {
        ReadingValue::parse(self.value)
    }
}
