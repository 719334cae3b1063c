use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::error::Result;
use crate::sensor::Reading;
use crate::source::SensorSource;

/// Produces slowly drifting synthetic readings, for running the dashboard without a device.
#[derive(Default)]
pub struct DummySensorSource {
    calls: AtomicU64,
}

impl DummySensorSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn reading(n: u64) -> Reading {
        let t = n as f64 / 5.0;
        Reading {
            temperature: 21.0 + t.sin() * 1.5,
            humidity: 45.0 + (t / 2.0).cos() * 5.0,
            lux: 300.0 + (t * 1.3).sin() * 120.0,
        }
    }
}

#[async_trait]
impl SensorSource for DummySensorSource {
    async fn fetch(&self) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);

        Ok(serde_json::to_string(&Self::reading(n))?)
    }
}

#[tokio::test]
async fn test_dummy_sensor_source() {
    let source = DummySensorSource::new();

    let first = Reading::from_json(&source.fetch().await.unwrap()).unwrap();
    let second = Reading::from_json(&source.fetch().await.unwrap()).unwrap();

    assert_eq!(first.temperature, 21.0);
    assert_ne!(first, second);
    assert!((150.0..=450.0).contains(&second.lux));
}
