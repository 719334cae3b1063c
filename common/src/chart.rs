use chrono::TimeZone;

use crate::sensor::LightSample;

/// One point of the light intensity line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartPoint {
    /// Position of the sample in the window, oldest first.
    pub index: usize,
    pub lux: f64,
}

/// Drawable line series of the light window.
///
/// Points map sample index to lux; labels are the local time of day of each sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightChart {
    points: Vec<ChartPoint>,
    labels: Vec<String>,
    capacity: usize,
}

impl LightChart {
    pub const TIME_FORMAT: &'static str = "%I:%M:%S %p";

    pub fn from_samples(samples: &[LightSample], capacity: usize) -> Self {
        Self {
            points: samples
                .iter()
                .enumerate()
                .map(|(index, sample)| ChartPoint {
                    index,
                    lux: sample.value,
                })
                .collect(),
            labels: samples
                .iter()
                .map(|sample| format_time_of_day(sample.timestamp))
                .collect(),
            capacity: capacity.max(samples.len()),
        }
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The x-axis label of `index`, empty when there is no such sample.
    pub fn label(&self, index: usize) -> &str {
        self.labels.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lowest and highest lux of the series. A flat series is padded by one lux
    /// on each side, an empty one spans `0..1`.
    pub fn y_range(&self) -> (f64, f64) {
        let mut values = self.points.iter().map(|p| p.lux);
        let Some(first) = values.next() else {
            return (0.0, 1.0);
        };

        let (min, max) = values.fold((first, first), |(min, max), v| (min.min(v), max.max(v)));
        if min == max {
            (min - 1.0, max + 1.0)
        } else {
            (min, max)
        }
    }

    /// Position of point `index` scaled into a `width` x `height` box, y growing downwards.
    ///
    /// Points are spread over the full window capacity, so a partial window fills
    /// the box from the left.
    pub fn position(&self, index: usize, width: f64, height: f64) -> Option<(f64, f64)> {
        let point = self.points.get(index)?;
        let (min, max) = self.y_range();

        let x = if self.capacity > 1 {
            point.index as f64 * width / (self.capacity - 1) as f64
        } else {
            0.0
        };
        let y = height - (point.lux - min) / (max - min) * height;

        Some((x, y))
    }

    /// SVG style path commands (`M x y L x y ...`) of the line in a `width` x `height` box.
    pub fn path_commands(&self, width: f64, height: f64) -> String {
        (0..self.points.len())
            .filter_map(|index| self.position(index, width, height))
            .enumerate()
            .map(|(i, (x, y))| {
                let command = if i == 0 { 'M' } else { 'L' };
                format!("{command} {x:.2} {y:.2}")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Formats epoch milliseconds as a local time of day, e.g. `03:04:05 PM`.
pub fn format_time_of_day(timestamp: i64) -> String {
    chrono::Local
        .timestamp_millis_opt(timestamp)
        .single()
        .map(|time| time.format(LightChart::TIME_FORMAT).to_string())
        .unwrap_or_default()
}
