mod sensorsource;
mod httpsensorclient;
mod dummysensorsource;

pub use sensorsource::SensorSource;
pub use sensorsource::SensorSourcePointer;

pub use httpsensorclient::HttpSensorClient;
pub use dummysensorsource::DummySensorSource;

/// Loopback HTTP stub answering one connection per prepared response.
#[cfg(test)]
pub(crate) mod stub {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `responses` in order, one per connection, and returns the URL to hit.
    pub(crate) async fn serve(responses: Vec<(&'static str, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for (status_line, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;

                let response = format!(
                    "HTTP/1.1 {status_line}\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{addr}/getData")
    }

    pub(crate) async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        serve(vec![(status_line, body)]).await
    }
}
