use crate::chart::LightChart;
use crate::error::MonitorError;
use crate::sensor::{LightSample, Reading};
use crate::window::LightWindow;

/// Which values the cards show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing fetched yet, the cards show placeholders.
    #[default]
    Idle,

    /// The cards show the last successfully fetched reading.
    Displaying,
}

/// A transient, non-blocking message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Increases by one for every notification of a display loop.
    pub id: u64,
    pub message: String,
}

impl Notification {
    pub fn fetch_failed(id: u64, err: &MonitorError) -> Self {
        Self {
            id,
            message: format!("Failed to fetch sensor data: {err}"),
        }
    }
}

/// Immutable view of the dashboard handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSnapshot {
    pub phase: Phase,
    pub reading: Option<Reading>,
    pub samples: Vec<LightSample>,
    pub window_capacity: usize,

    /// The loading indicator is visible.
    pub loading: bool,

    /// A fetch is outstanding.
    pub fetching: bool,
}

impl DashboardSnapshot {
    pub fn temperature_text(&self) -> String {
        self.reading
            .map(|r| r.temperature_label())
            .unwrap_or_else(|| Reading::TEMPERATURE_PLACEHOLDER.into())
    }

    pub fn humidity_text(&self) -> String {
        self.reading
            .map(|r| r.humidity_label())
            .unwrap_or_else(|| Reading::HUMIDITY_PLACEHOLDER.into())
    }

    pub fn lux_text(&self) -> String {
        self.reading
            .map(|r| r.lux_label())
            .unwrap_or_else(|| Reading::LUX_PLACEHOLDER.into())
    }

    pub fn refresh_enabled(&self) -> bool {
        !self.loading
    }

    pub fn refresh_text(&self) -> &'static str {
        if self.loading {
            "Loading..."
        } else {
            "Refresh"
        }
    }

    pub fn chart(&self) -> LightChart {
        LightChart::from_samples(&self.samples, self.window_capacity)
    }
}

/// The mutable dashboard state, owned by the display loop.
#[derive(Debug)]
pub struct DashboardState {
    reading: Option<Reading>,
    window: LightWindow,
    loading: bool,
    fetching: bool,
    notifications: u64,
}

impl DashboardState {
    pub fn new(window_capacity: usize) -> Self {
        Self {
            reading: None,
            window: LightWindow::new(window_capacity),
            loading: true,
            fetching: false,
            notifications: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.reading.is_some() {
            Phase::Displaying
        } else {
            Phase::Idle
        }
    }

    pub fn reading(&self) -> Option<&Reading> {
        self.reading.as_ref()
    }

    pub fn window(&self) -> &LightWindow {
        &self.window
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Marks a fetch as started. A manual fetch brings the loading indicator back.
    pub fn begin_fetch(&mut self, manual: bool) {
        self.fetching = true;
        if manual {
            self.loading = true;
        }
    }

    /// Applies the outcome of a fetch received at `timestamp` (epoch ms).
    ///
    /// On success the reading is replaced and a light sample appended. On failure
    /// reading and samples stay untouched and the notification to show is returned.
    /// Either way the loading indicator is cleared.
    pub fn complete(
        &mut self,
        outcome: Result<Reading, MonitorError>,
        timestamp: i64,
    ) -> Result<Reading, Notification> {
        self.fetching = false;
        self.loading = false;

        match outcome {
            Ok(reading) => {
                self.reading = Some(reading);
                self.window.push(LightSample::new(reading.lux, timestamp));
                Ok(reading)
            }
            Err(err) => {
                self.notifications += 1;
                Err(Notification::fetch_failed(self.notifications, &err))
            }
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            phase: self.phase(),
            reading: self.reading,
            samples: self.window.to_vec(),
            window_capacity: self.window.capacity(),
            loading: self.loading,
            fetching: self.fetching,
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(LightWindow::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_with_placeholders() {
        let snapshot = DashboardState::default().snapshot();

        assert_eq!(snapshot.phase, Phase::Idle);
        assert!(snapshot.loading);
        assert!(!snapshot.refresh_enabled());
        assert_eq!(snapshot.refresh_text(), "Loading...");
        assert_eq!(snapshot.temperature_text(), "--°C");
        assert_eq!(snapshot.humidity_text(), "--%");
        assert_eq!(snapshot.lux_text(), "-- lx");
        assert!(snapshot.samples.is_empty());
    }

    #[test]
    fn success_switches_to_displaying() {
        let mut state = DashboardState::default();
        state.begin_fetch(false);

        let result = state.complete(Ok(Reading::new(21.5, 40.2, 123.0)), 1_000);
        let snapshot = state.snapshot();

        assert_eq!(result, Ok(Reading::new(21.5, 40.2, 123.0)));
        assert_eq!(snapshot.phase, Phase::Displaying);
        assert_eq!(snapshot.reading, Some(Reading::new(21.5, 40.2, 123.0)));
        assert_eq!(snapshot.samples, vec![LightSample::new(123.0, 1_000)]);
        assert_eq!(snapshot.temperature_text(), "21.5°C");
        assert!(!snapshot.loading);
        assert!(!snapshot.fetching);
    }

    #[test]
    fn first_failure_clears_loading_but_stays_idle() {
        let mut state = DashboardState::default();
        state.begin_fetch(false);

        let notification = state
            .complete(Err(MonitorError::Network("Unexpected response: 500".into())), 1_000)
            .unwrap_err();

        assert_eq!(notification.id, 1);
        assert_eq!(
            notification.message,
            "Failed to fetch sensor data: Unexpected response: 500"
        );
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.is_loading());
        assert!(state.window().is_empty());
    }

    #[test]
    fn failure_keeps_previous_values() {
        let mut state = DashboardState::default();
        let _ = state.complete(Ok(Reading::new(20.0, 50.0, 10.0)), 1_000);
        let before = state.snapshot();

        state.begin_fetch(false);
        assert!(state
            .complete(Err(MonitorError::Parse("expected value".into())), 2_000)
            .is_err());

        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn manual_fetch_shows_loading_until_done() {
        let mut state = DashboardState::default();
        let _ = state.complete(Ok(Reading::new(20.0, 50.0, 10.0)), 1_000);

        state.begin_fetch(true);
        assert!(state.snapshot().loading);
        assert!(state.snapshot().fetching);

        let _ = state.complete(Ok(Reading::new(20.5, 50.0, 11.0)), 2_000);
        assert!(state.snapshot().refresh_enabled());
        assert_eq!(state.window().len(), 2);
    }
}
