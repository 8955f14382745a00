//! Shared helpers for integration tests: a canned HTTP backend and log capture.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::subscriber::DefaultGuard;

/// Minimal HTTP/1.1 server answering every request with the same response
pub struct Backend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    /// Start serving `status` with `body` as JSON
    pub async fn start(status: u16, reason: &str, body: &str) -> Self {
        Self::start_with_type(status, reason, "application/json", body).await
    }

    pub async fn start_with_type(
        status: u16,
        reason: &str,
        content_type: &str,
        body: &str,
    ) -> Self {
        Self::start_raw(response(status, reason, content_type, body.len(), body)).await
    }

    /// Serve a 200 that promises `declared_len` bytes but sends only `body`
    pub async fn start_truncated(declared_len: usize, body: &str) -> Self {
        Self::start_raw(response(200, "OK", "application/json", declared_len, body)).await
    }

    async fn start_raw(response: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };

                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            request.extend_from_slice(&chunk[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }

                let request = String::from_utf8_lossy(&request);
                if let Some(path) = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                {
                    seen.lock().unwrap().push(path.to_string());
                }

                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Request paths received so far
    pub fn paths(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn response(
    status: u16,
    reason: &str,
    content_type: &str,
    content_length: usize,
    body: &str,
) -> String {
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        status, reason, content_type, content_length, body
    )
}

/// Base URL of a port with nothing listening on it
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Shared in-memory log sink
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines logged at `level` (e.g. "ERROR") mentioning the provider tag
    pub fn provider_lines(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(level) && line.contains("[CUSTOM_TRENDS]"))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture all tracing output on the current thread until the guard drops
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let logs = LogBuffer::default();
    let writer = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    (logs, tracing::subscriber::set_default(subscriber))
}

/// Provider with the given fallback and a client that ignores proxy settings
pub fn provider(fallback: custom_trends::StaticSettings) -> custom_trends::TrendsProvider {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    custom_trends::TrendsProvider::with_fallback(fallback).with_client(client)
}
