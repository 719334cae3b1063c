//! UI-agnostic core of the environmental monitor dashboard.
//!
//! A [`DisplayLoop`] polls a [`SensorSource`] on a fixed schedule, folds each reading
//! into the dashboard state and publishes immutable [`DashboardSnapshot`]s to a
//! [`DisplaySink`], which the UI implements.

pub mod chart;
pub mod config;
pub mod error;
pub mod poller;
pub mod schedule;
pub mod sensor;
pub mod source;
pub mod state;
pub mod window;

pub use chart::LightChart;
pub use config::MonitorConfig;
pub use error::{MonitorError, Result};
pub use poller::{DisplayLoop, DisplaySink, LoopHandle, RefreshRequest, TickOutcome, Trigger};
pub use schedule::{Scheduler, Shutdown};
pub use sensor::{LightSample, Reading};
pub use state::{DashboardSnapshot, DashboardState, Notification, Phase};
pub use window::LightWindow;
