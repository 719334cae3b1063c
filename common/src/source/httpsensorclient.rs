use async_trait::async_trait;

use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::source::SensorSource;

/// Fetches readings from the sensor device with a plain HTTP GET.
pub struct HttpSensorClient {
    client: reqwest::Client,
    url: String,
}

impl HttpSensorClient {
    /// Creates a client for `config.sensor_url` whose calls time out after
    /// `config.call_timeout()`, body included.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.call_timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.sensor_url.clone(),
        })
    }
}

#[async_trait]
impl SensorSource for HttpSensorClient {
    async fn fetch(&self) -> Result<String> {
        log::debug!("-> GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        log::debug!("<- {}", status);
        if !status.is_success() {
            return Err(MonitorError::Network(format!(
                "Unexpected response: {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(MonitorError::Network("Empty response body".into()));
        }

        log::debug!("Read {} bytes", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::stub::serve_once;
    use std::time::Duration;
    use tokio::net::TcpListener;

    fn client_for(url: String) -> HttpSensorClient {
        HttpSensorClient::new(&MonitorConfig::default().with_sensor_url(url)).unwrap()
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let payload = r#"{"temperature":21.5,"humidity":40.2,"lux":123.0}"#;
        let client = client_for(serve_once("200 OK", payload).await);

        assert_eq!(client.fetch().await.unwrap(), payload);
    }

    #[tokio::test]
    async fn server_error_is_a_network_error() {
        let client = client_for(serve_once("500 Internal Server Error", "oops").await);

        let err = client.fetch().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.to_string(), "Unexpected response: 500");
    }

    #[tokio::test]
    async fn empty_body_is_a_network_error() {
        let client = client_for(serve_once("200 OK", "").await);

        let err = client.fetch().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.to_string(), "Empty response body");
    }

    #[tokio::test]
    async fn whitespace_body_is_a_network_error() {
        let client = client_for(serve_once("200 OK", "  \r\n").await);

        let err = client.fetch().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.to_string(), "Empty response body");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}/getData"));

        assert!(client.fetch().await.unwrap_err().is_network());
    }

    #[tokio::test]
    async fn silent_device_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(stream);
        });

        let config = MonitorConfig::default()
            .with_sensor_url(format!("http://{addr}/getData"))
            .with_call_timeout(Duration::from_millis(200));
        let client = HttpSensorClient::new(&config).unwrap();

        let err = client.fetch().await.unwrap_err();
        assert!(err.is_network());
        assert!(err.to_string().contains("timed out"));

        server.abort();
    }
}
