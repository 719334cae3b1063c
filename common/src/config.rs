use serde::Deserialize;
use std::time::Duration;

/// Runtime settings of the monitor.
///
/// All values are compiled-in defaults matching the sensor device shipped with the
/// dashboard; the `with_*` setters exist for tests and demo builds.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// The HTTP endpoint of the sensor device.
    pub sensor_url: String,

    /// Overall timeout of one GET call, in milliseconds.
    pub call_timeout_ms: u64,

    /// Time between two scheduled ticks, in milliseconds.
    pub poll_interval_ms: u64,

    /// Number of light samples kept for the chart.
    pub window_capacity: usize,

    /// How long a failure toast stays visible, in milliseconds.
    pub toast_duration_ms: u64,
}

impl MonitorConfig {
    pub const DEFAULT_SENSOR_URL: &'static str = "http://192.168.1.105/getData";

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn with_sensor_url(mut self, url: impl Into<String>) -> Self {
        self.sensor_url = url.into();
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = capacity;
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sensor_url: Self::DEFAULT_SENSOR_URL.to_string(),
            call_timeout_ms: 10_000,
            poll_interval_ms: 1_000,
            window_capacity: 10,
            toast_duration_ms: 3_500,
        }
    }
}

#[test]
fn test_default_config() {
    let config = MonitorConfig::default();

    assert_eq!(config.sensor_url, "http://192.168.1.105/getData");
    assert_eq!(config.call_timeout(), Duration::from_secs(10));
    assert_eq!(config.poll_interval(), Duration::from_millis(1000));
    assert_eq!(config.window_capacity, 10);
}

#[test]
fn test_durations_saturate() {
    let config = MonitorConfig::default()
        .with_call_timeout(Duration::MAX)
        .with_poll_interval(Duration::from_millis(250));

    assert_eq!(config.call_timeout_ms, u64::MAX);
    assert_eq!(config.poll_interval(), Duration::from_millis(250));
}

#[test]
fn test_partial_config_falls_back_to_defaults() {
    let config: MonitorConfig =
        serde_json::from_str(r#"{ "sensor_url": "http://10.0.0.7/getData" }"#).unwrap();

    assert_eq!(config.sensor_url, "http://10.0.0.7/getData");
    assert_eq!(config.poll_interval_ms, 1_000);
}
