use std::fmt;

use http::StatusCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::HttpError;

/// One of the four numeric sensor readings a request may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorField {
    /// Air temperature in °C
    Temperature,
    /// Relative humidity in percent
    Humidity,
    /// Volumetric soil moisture in percent
    Moisture,
    /// Soil pH
    Ph,
}

impl SensorField {
    /// All fields, in routing and reporting order
    pub const ALL: [Self; 4] = [Self::Temperature, Self::Humidity, Self::Moisture, Self::Ph];

    /// Wire name of the field
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Moisture => "moisture",
            Self::Ph => "ph",
        }
    }

    /// Inclusive range of accepted values
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Self::Temperature => (-50.0, 70.0),
            Self::Humidity | Self::Moisture => (0.0, 100.0),
            Self::Ph => (0.0, 14.0),
        }
    }
}

impl fmt::Display for SensorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured numeric fields of a request, each optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
}

impl SensorReadings {
    /// Reading for a single field
    pub const fn get(&self, field: SensorField) -> Option<f64> {
        match field {
            SensorField::Temperature => self.temperature,
            SensorField::Humidity => self.humidity,
            SensorField::Moisture => self.moisture,
            SensorField::Ph => self.ph,
        }
    }

    /// Present readings in field order
    pub fn present(&self) -> impl Iterator<Item = (SensorField, f64)> + '_ {
        SensorField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    /// Whether no reading is present
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    fn validate(&self) -> Result<(), RequestRejection> {
        for (field, value) in self.present() {
            if !value.is_finite() {
                return Err(RequestRejection::NotFinite { field });
            }

            let (min, max) = field.bounds();
            if !(min..=max).contains(&value) {
                return Err(RequestRejection::OutOfRange { field, value, min, max });
            }
        }

        Ok(())
    }
}

/// Reasons an inbound request is refused before classification
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestRejection {
    /// Neither query text nor any sensor reading was supplied
    #[error("request must include a non-empty query or at least one sensor reading")]
    Empty,

    /// A reading was NaN or infinite
    #[error("{field} must be a finite number")]
    NotFinite { field: SensorField },

    /// A reading fell outside its accepted range
    #[error("{field} = {value} is outside the accepted range {min}..={max}")]
    OutOfRange {
        field: SensorField,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl HttpError for RequestRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_type(&self) -> &str {
        "invalid_request_error"
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

/// A validated inbound inference request
///
/// Only obtainable through [`InferenceRequest::new`], so every instance
/// carries query text, sensor readings, or both.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    id: Uuid,
    received_at: Timestamp,
    query: Option<String>,
    readings: SensorReadings,
}

impl InferenceRequest {
    /// Validate and stamp a new request
    ///
    /// Query text is trimmed; blank text counts as absent.
    ///
    /// # Errors
    ///
    /// Returns `RequestRejection::Empty` when neither a query nor a
    /// reading is present, or a range error for an invalid reading.
    pub fn new(query: Option<String>, readings: SensorReadings) -> Result<Self, RequestRejection> {
        let query = query
            .map(|q| q.trim().to_owned())
            .filter(|q| !q.is_empty());

        readings.validate()?;

        if query.is_none() && readings.is_empty() {
            return Err(RequestRejection::Empty);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            received_at: Timestamp::now(),
            query,
            readings,
        })
    }

    /// Replace the generated id, e.g. with one assigned at the HTTP edge
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn received_at(&self) -> Timestamp {
        self.received_at
    }

    /// Trimmed query text, if any
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub const fn readings(&self) -> &SensorReadings {
        &self.readings
    }

    /// Whether at least one numeric reading is present
    pub fn has_readings(&self) -> bool {
        !self.readings.is_empty()
    }
}
