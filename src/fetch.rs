use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

const USER_AGENT: &str = concat!("contact_scraper/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { status: reqwest::StatusCode, url: String },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Single-shot GET client. No retries; redirects follow the reqwest default.
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl Fetcher {
    /// `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().map_err(FetchError::Client)?;
        Ok(Self { client, timeout })
    }

    /// Fetch `url` and return its body as text, whatever the content type.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching {}", url);
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned {}", url, status);
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(url, e))?;
        info!(
            bytes = body.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Fetched {} ({})",
            url,
            status
        );
        Ok(body)
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> FetchError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => FetchError::Timeout {
                url: url.to_string(),
                timeout,
            },
            _ => FetchError::Transport {
                url: url.to_string(),
                source: err,
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_server::{serve_once, serve_once_after};
    use super::*;

    #[tokio::test]
    async fn ok_returns_body() {
        let url = serve_once("200 OK", "<p>信箱：a@b.tw</p>");
        let body = Fetcher::new(Some(Duration::from_secs(5))).unwrap().fetch(&url).await.unwrap();
        assert_eq!(body, "<p>信箱：a@b.tw</p>");
    }

    #[tokio::test]
    async fn not_found_is_status_error() {
        let url = serve_once("404 Not Found", "gone");
        let err = Fetcher::new(Some(Duration::from_secs(5))).unwrap().fetch(&url).await.unwrap_err();
        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let url = serve_once("503 Service Unavailable", "");
        let err = Fetcher::new(None).unwrap().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status.as_u16() == 503));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let url = serve_once_after("200 OK", "late", Duration::from_secs(3));
        let err = Fetcher::new(Some(Duration::from_millis(200)))
            .unwrap()
            .fetch(&url)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let err = Fetcher::new(Some(Duration::from_secs(2)))
            .unwrap()
            .fetch(&format!("http://127.0.0.1:{port}/"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "got {err:?}");
    }
}
