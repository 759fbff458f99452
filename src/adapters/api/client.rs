//! Gameflip HTTP Client - Signed REST API Client
//!
//! Wraps reqwest with per-request HMAC signing, a request timeout,
//! and bounded retries with exponential backoff for all Gameflip
//! REST API interactions.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, StatusCode};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::auth::GfAuth;
use super::types::ApiResponse;
use crate::config::ApiConfig;

/// Configuration for the Gameflip HTTP client.
#[derive(Debug, Clone)]
pub struct GfClientConfig {
  /// Base URL for the Gameflip API.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
  /// Maximum retries on transient errors (DELETE only).
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff).
  pub retry_base_delay: Duration,
}

impl From<&ApiConfig> for GfClientConfig {
  fn from(api: &ApiConfig) -> Self {
    Self {
      base_url: api.base_url.trim_end_matches('/').to_string(),
      timeout: api.timeout(),
      max_retries: api.max_retries,
      retry_base_delay: api.retry_base_delay(),
    }
  }
}

/// Signed HTTP client for the Gameflip API.
pub struct GfClient {
  /// Underlying HTTP client.
  http: Client,
  /// Request signer.
  auth: GfAuth,
  /// Client configuration.
  config: GfClientConfig,
}

impl GfClient {
  /// Create a new Gameflip client.
  pub fn new(auth: GfAuth, config: GfClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(2)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, auth, config })
  }

  /// Send a signed POST. Never retried: a repeated create could
  /// duplicate the listing.
  pub async fn post(&self, path: &str, body: String) -> Result<ApiResponse> {
    self.execute_with_retry(Method::POST, path, Some(body), 0).await
  }

  /// Send a signed DELETE, retried on transient errors.
  pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
    self
      .execute_with_retry(Method::DELETE, path, None, self.config.max_retries)
      .await
  }

  /// Execute a signed request, retrying transport errors, 429 and 5xx
  /// up to `max_retries` times with exponential backoff.
  ///
  /// Any other status, success or not, is returned as a response.
  async fn execute_with_retry(
    &self,
    method: Method,
    path: &str,
    body: Option<String>,
    max_retries: u32,
  ) -> Result<ApiResponse> {
    let url = format!("{}{}", self.config.base_url, path);
    let body_str = body.as_deref().unwrap_or_default();

    let mut last_error = None;

    for attempt in 0..=max_retries {
      if attempt > 0 {
        let delay = self
          .config
          .retry_base_delay
          .checked_mul(2u32.saturating_pow(attempt - 1))
          .unwrap_or(Duration::MAX);
        debug!(attempt, delay_ms = delay.as_millis(), path, "Retrying request");
        sleep(delay).await;
      }

      // Re-signed every attempt so each carries a fresh nonce
      let headers = self.auth.auth_headers(path, method.as_str(), body_str)?;

      let mut req = self.http.request(method.clone(), &url).headers(headers);
      if let Some(body) = &body {
        req = req.body(body.clone());
      }

      match req.send().await {
        Ok(response) => {
          let status = response.status();
          let retryable =
            status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

          if retryable && attempt < max_retries {
            warn!(status = %status, attempt, path, "Transient API error, retrying");
            last_error = Some(anyhow::anyhow!("API error {status}"));
            continue;
          }

          let text = response.text().await.unwrap_or_default();
          return Ok(ApiResponse { status, body: text });
        }
        Err(e) => {
          warn!(error = %e, attempt, path, "Request failed");
          last_error = Some(e.into());
        }
      }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};
  use std::time::Instant;

  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::{TcpListener, TcpStream};

  use super::*;
  use crate::adapters::api::auth::HEADER_NONCE;

  /// What the server does with one connection.
  #[derive(Clone, Copy)]
  enum Reply {
    Status(u16),
    Hangup,
    Stall,
  }

  /// Method and nonce of one received request.
  #[derive(Debug, Clone)]
  struct Seen {
    method: String,
    nonce: String,
  }

  /// Serve one connection per entry of `replies`, recording each request.
  async fn serve(replies: Vec<Reply>) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&seen);
    tokio::spawn(async move {
      for reply in replies {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        log.lock().unwrap().push(request);

        match reply {
          Reply::Status(status) => {
            let response = format!(
              "HTTP/1.1 {status} X\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok"
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
          }
          Reply::Hangup => drop(socket),
          Reply::Stall => {
            tokio::time::sleep(Duration::from_secs(30)).await;
          }
        }
      }
    });

    (base_url, seen)
  }

  async fn read_request(socket: &mut TcpStream) -> Seen {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
      let n = socket.read(&mut chunk).await.unwrap();
      assert!(n > 0, "client closed before sending headers");
      buf.extend_from_slice(&chunk[..n]);
      if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
        break pos + 4;
      }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.lines();
    let method = lines
      .next()
      .and_then(|line| line.split_whitespace().next())
      .unwrap_or_default()
      .to_string();

    let header = |name: &str| {
      head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim().to_string())
    };

    let content_length: usize = header("content-length")
      .and_then(|v| v.parse().ok())
      .unwrap_or(0);
    while buf.len() < head_end + content_length {
      let n = socket.read(&mut chunk).await.unwrap();
      if n == 0 {
        break;
      }
      buf.extend_from_slice(&chunk[..n]);
    }

    Seen {
      method,
      nonce: header(HEADER_NONCE).unwrap_or_default(),
    }
  }

  fn client(base_url: String) -> GfClient {
    let config = GfClientConfig {
      base_url,
      timeout: Duration::from_millis(300),
      max_retries: 3,
      retry_base_delay: Duration::from_millis(20),
    };
    GfClient::new(GfAuth::new("key", "secret"), config).unwrap()
  }

  #[tokio::test]
  async fn test_post_is_sent_once_on_server_error() {
    let (base_url, seen) = serve(vec![Reply::Status(500), Reply::Status(200)]).await;

    let response = client(base_url)
      .post("/listing", r#"{"title":"Sword"}"#.to_string())
      .await
      .unwrap();

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
  }

  #[tokio::test]
  async fn test_delete_retried_until_success_with_fresh_nonces() {
    let (base_url, seen) =
      serve(vec![Reply::Status(500), Reply::Status(429), Reply::Status(200)]).await;

    let started = Instant::now();
    let response = client(base_url).delete("/listing/abc").await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    // Backoff of 20ms then 40ms
    assert!(started.elapsed() >= Duration::from_millis(60));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|s| s.method == "DELETE"));
    assert!(seen.iter().all(|s| !s.nonce.is_empty()));
    assert_ne!(seen[0].nonce, seen[1].nonce);
    assert_ne!(seen[1].nonce, seen[2].nonce);
    assert_ne!(seen[0].nonce, seen[2].nonce);
  }

  #[tokio::test]
  async fn test_delete_retries_transport_error() {
    let (base_url, seen) = serve(vec![Reply::Hangup, Reply::Status(200)]).await;

    let response = client(base_url).delete("/listing/abc").await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(seen.lock().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn test_delete_client_error_not_retried() {
    let (base_url, seen) = serve(vec![Reply::Status(404), Reply::Status(200)]).await;

    let response = client(base_url).delete("/listing/gone").await.unwrap();

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(seen.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_delete_gives_up_after_max_retries() {
    let (base_url, seen) = serve(vec![Reply::Status(503); 4]).await;

    let response = client(base_url).delete("/listing/abc").await.unwrap();

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(seen.lock().unwrap().len(), 4);
  }

  #[tokio::test]
  async fn test_hung_request_times_out() {
    let (base_url, _seen) = serve(vec![Reply::Stall]).await;

    let started = Instant::now();
    let result = client(base_url)
      .post("/listing", "{}".to_string())
      .await;

    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
  }
}
