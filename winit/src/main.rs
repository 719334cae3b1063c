// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

use std::time::Duration;

use envmon_common::source::SensorSourcePointer;
use envmon_common::{
    DashboardSnapshot, DisplayLoop, DisplaySink, LoopHandle, MonitorConfig, Notification,
};

/// Our App struct that holds the UI and the handle of the display loop.
///
/// The display loop runs on its own thread with a tokio runtime, so a slow sensor
/// never blocks the UI. Everything it publishes is moved onto the UI thread by the
/// [`SlintSink`].
struct App {
    ui: AppWindow,
    display_loop: LoopHandle,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl App {
    /// Create a new App struct.
    ///
    /// Builds the UI, wires the refresh button and starts the display loop thread.
    fn new() -> anyhow::Result<Self> {
        // Make a new AppWindow
        let ui = AppWindow::new()?;

        let config = MonitorConfig::default();
        let sink = SlintSink {
            ui: ui.as_weak(),
            toast_duration: config.toast_duration(),
        };
        let display_loop = DisplayLoop::new(Self::sensor_source(&config)?, sink, &config);
        let handle = display_loop.handle();

        // The refresh button only asks; the loop decides whether a fetch is already running.
        let refresh_handle = handle.clone();
        ui.global::<ViewModel>().on_refresh(move || {
            let request = refresh_handle.request_refresh();
            log::debug!("Refresh requested: {request:?}");
        });

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let worker = std::thread::Builder::new()
            .name("display-loop".into())
            .spawn(move || runtime.block_on(display_loop.run()))?;

        // Return the App struct
        Ok(Self {
            ui,
            display_loop: handle,
            worker: Some(worker),
        })
    }

    #[cfg(not(feature = "demo"))]
    fn sensor_source(config: &MonitorConfig) -> anyhow::Result<SensorSourcePointer> {
        log::info!("Polling sensor at {}", config.sensor_url);
        Ok(Box::new(envmon_common::source::HttpSensorClient::new(config)?))
    }

    #[cfg(feature = "demo")]
    fn sensor_source(_config: &MonitorConfig) -> anyhow::Result<SensorSourcePointer> {
        log::info!("Using synthetic sensor readings");
        Ok(Box::new(envmon_common::source::DummySensorSource::new()))
    }

    /// Run the UI until the window is closed, then stop the display loop.
    fn run(&mut self) -> anyhow::Result<()> {
        let result = self.ui.run();

        self.display_loop.shutdown();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Display loop thread panicked");
            }
        }

        // Map a UI error to an anyhow::Error.
        result.map_err(|e| e.into())
    }
}

/// Forwards snapshots and notifications from the display loop to the UI thread.
struct SlintSink {
    ui: slint::Weak<AppWindow>,
    toast_duration: Duration,
}

impl DisplaySink for SlintSink {
    fn render(&self, snapshot: DashboardSnapshot) {
        let result = self.ui.upgrade_in_event_loop(move |ui| {
            show_snapshot(&ui.global::<ViewModel>(), &snapshot);
        });

        if let Err(e) = result {
            log::warn!("Dropping snapshot, UI is gone: {e}");
        }
    }

    fn notify(&self, notification: Notification) {
        let toast_duration = self.toast_duration;
        let result = self.ui.upgrade_in_event_loop(move |ui| {
            let model = ViewModel::get(&ui);
            let id = notification.id as i32;
            model.set_toast(notification.message.into());
            model.set_toast_id(id);
            model.set_toast_visible(true);

            // Only hide the toast if no newer one replaced it meanwhile.
            let ui_handle = ui.as_weak();
            slint::Timer::single_shot(toast_duration, move || {
                if let Some(ui) = ui_handle.upgrade() {
                    let model = ViewModel::get(&ui);
                    if model.get_toast_id() == id {
                        model.set_toast_visible(false);
                    }
                }
            });
        });

        if let Err(e) = result {
            log::warn!("Dropping notification, UI is gone: {e}");
        }
    }
}

/// Copy a snapshot into the view model.
fn show_snapshot(model: &ViewModel, snapshot: &DashboardSnapshot) {
    model.set_temperature(snapshot.temperature_text().into());
    model.set_humidity(snapshot.humidity_text().into());
    model.set_lux(snapshot.lux_text().into());

    model.set_loading(snapshot.loading);
    model.set_refresh_text(snapshot.refresh_text().into());

    let chart = snapshot.chart();
    let (min, max) = chart.y_range();
    let dots: Vec<ChartDot> = chart
        .points()
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            chart.position(index, 1.0, 1.0).map(|(x, y)| ChartDot {
                x: x as f32,
                y: y as f32,
                value: slint::format!("{:.1}", point.lux),
                label: chart.label(index).into(),
            })
        })
        .collect();

    model.set_chart_path(chart.path_commands(100.0, 100.0).into());
    model.set_chart_dots(slint::ModelRc::new(slint::VecModel::from(dots)));
    model.set_chart_slots(snapshot.window_capacity as i32);
    if chart.is_empty() {
        model.set_chart_min("".into());
        model.set_chart_max("".into());
    } else {
        model.set_chart_min(slint::format!("{min:.0}"));
        model.set_chart_max(slint::format!("{max:.0}"));
    }
}

/// A minimal main function that initializes the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = App::new()?;

    app.run()
}
