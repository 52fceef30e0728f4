//! Rate-limited HTTP fetching with bounded retries
//!
//! Every request, retries included, first takes a permit from the gate;
//! the gate's pacing is the only backoff. Throttled responses are retried
//! up to a budget, everything else propagates on first sight.

use crate::harvest::rate_gate::RateGate;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the fetch layer
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} kept throttling after {attempts} attempts")]
    TooManyRetries { url: String, attempts: u32 },
}

/// HTTP fetcher that shares one connection pool and one [`RateGate`]
/// across every call.
pub struct RetryingFetcher {
    client: Client,
    gate: RateGate,
    max_retries: u32,
}

impl RetryingFetcher {
    /// Builds the fetcher and its HTTP client.
    ///
    /// Certificate verification is off: detail pages are served through
    /// hosts whose certificates do not always validate.
    pub fn new(gate: RateGate, max_retries: u32) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            gate,
            max_retries,
        })
    }

    /// Fetches `url` and returns the response body.
    ///
    /// An HTTP 429 is retried up to the configured budget, each retry going
    /// through the gate again; running out of budget surfaces as
    /// [`FetchError::TooManyRetries`]. Any other error status propagates
    /// immediately, unretried.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        for attempt in 0..=self.max_retries {
            self.gate.acquire().await;

            let response =
                self.client
                    .get(url)
                    .send()
                    .await
                    .map_err(|source| FetchError::Transport {
                        url: url.to_string(),
                        source,
                    })?;

            let status = response.status();
            if status.is_success() {
                return response
                    .text()
                    .await
                    .map_err(|source| FetchError::Transport {
                        url: url.to_string(),
                        source,
                    });
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::debug!(
                    "{url} throttled (attempt {}/{})",
                    attempt + 1,
                    self.max_retries + 1
                );
                continue;
            }

            tracing::error!("{url} failed with status {}", status.as_u16());
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        tracing::error!(
            "{url} still throttled after {} attempts",
            self.max_retries + 1
        );
        Err(FetchError::TooManyRetries {
            url: url.to_string(),
            attempts: self.max_retries + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher() -> RetryingFetcher {
        // wide pool and a tiny hold so tests never wait on the gate
        RetryingFetcher::new(RateGate::with_hold(32, Duration::from_millis(5)), 5).unwrap()
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/job"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let body = test_fetcher()
            .fetch(&format!("{}/job", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn retries_throttled_responses_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/job"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/job"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let body = test_fetcher()
            .fetch(&format!("{}/job", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn gives_up_after_the_retry_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/job"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = test_fetcher()
            .fetch(&format!("{}/job", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::TooManyRetries { attempts: 6, .. }
        ));
        // initial attempt plus five retries
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 6);
    }

    #[tokio::test]
    async fn other_error_statuses_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/job"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_fetcher()
            .fetch(&format!("{}/job", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 500, .. }));
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }
}
