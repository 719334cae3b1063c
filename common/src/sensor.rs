use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// One set of values reported by the sensor device.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Reading {
    /// Degrees Celsius.
    pub temperature: f64,

    /// Relative humidity in percent.
    pub humidity: f64,

    /// Illuminance in lux.
    pub lux: f64,
}

impl Reading {
    pub const TEMPERATURE_PLACEHOLDER: &'static str = "--°C";
    pub const HUMIDITY_PLACEHOLDER: &'static str = "--%";
    pub const LUX_PLACEHOLDER: &'static str = "-- lx";

    pub fn new(temperature: f64, humidity: f64, lux: f64) -> Self {
        Self { temperature, humidity, lux }
    }

    /// Parses the JSON body served by the device.
    ///
    /// The body must be an object with numeric `temperature`, `humidity` and `lux`
    /// fields. Extra fields are ignored, any other shape is rejected.
    pub fn from_json(body: &str) -> Result<Self> {
        let object: Map<String, Value> = serde_json::from_str(body)?;

        Ok(serde_json::from_value(Value::Object(object))?)
    }

    pub fn temperature_label(&self) -> String {
        format!("{}°C", format_value(self.temperature))
    }

    pub fn humidity_label(&self) -> String {
        format!("{}%", format_value(self.humidity))
    }

    pub fn lux_label(&self) -> String {
        format!("{} lx", format_value(self.lux))
    }
}

/// Shortest representation that reads back as the same value, with at least one decimal.
fn format_value(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// A light intensity value together with the wall-clock time it was received.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LightSample {
    /// Illuminance in lux.
    pub value: f64,

    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl LightSample {
    pub fn new(value: f64, timestamp: i64) -> Self {
        Self { value, timestamp }
    }
}

/// The current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
