use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub type SensorSourcePointer = Box<dyn SensorSource>;

/// Something that can hand out the raw body of a sensor reading.
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Performs one request and returns the raw response body.
    ///
    /// Fails with [`crate::MonitorError::Network`] when the device cannot be reached,
    /// answers with a non-success status or sends an empty body.
    async fn fetch(&self) -> Result<String>;
}

#[async_trait]
impl<T: SensorSource + ?Sized> SensorSource for Box<T> {
    async fn fetch(&self) -> Result<String> {
        (**self).fetch().await
    }
}

#[async_trait]
impl<T: SensorSource + ?Sized> SensorSource for Arc<T> {
    async fn fetch(&self) -> Result<String> {
        (**self).fetch().await
    }
}
