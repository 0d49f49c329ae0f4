use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::config::MovieApiConfig;

/// Source of catalog entries that are not mirrored locally.
///
/// `None` means the source could not be reached at all and is distinct from an
/// empty result set.
#[async_trait::async_trait]
pub trait MovieSource: Send + Sync {
    async fn fetch_movies(&self) -> Option<Vec<Value>>;
}

/// Bounded retry with a fixed pause after each failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Per-attempt request timeout
    pub timeout: Duration,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(10),
            backoff: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: Option<String>,
}

/// HTTP client for the third-party movie catalog
#[derive(Debug, Clone)]
pub struct HttpMovieSource {
    client: Client,
    url: String,
    credentials: Option<Credentials>,
    policy: RetryPolicy,
}

impl HttpMovieSource {
    pub fn new(url: impl Into<String>, policy: RetryPolicy, accept_invalid_certs: bool) -> Result<Self> {
        let url = url.into();
        if accept_invalid_certs {
            log::warn!(
                "TLS certificate validation is disabled for the movie API at {}",
                url
            );
        }

        let client = Client::builder()
            .timeout(policy.timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .context("Failed to build movie API HTTP client")?;

        Ok(Self {
            client,
            url,
            credentials: None,
            policy,
        })
    }

    pub fn from_config(config: &MovieApiConfig) -> Result<Self> {
        let source = Self::new(
            config.url.clone(),
            config.retry_policy(),
            config.accept_invalid_certs,
        )?;

        Ok(match &config.username {
            Some(username) => source.with_basic_auth(username.clone(), config.password.clone()),
            None => source,
        })
    }

    pub fn with_basic_auth(mut self, username: String, password: Option<String>) -> Self {
        self.credentials = Some(Credentials { username, password });
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// One request against the upstream, no retries
    async fn attempt(&self) -> Result<Vec<Value>> {
        let mut request = self.client.get(&self.url);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, credentials.password.as_ref());
        }

        let response = request.send().await.context("request failed")?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(anyhow!("status code {}", status.as_u16()));
        }

        let body: Value = response.json().await.context("response body is not JSON")?;
        extract_results(body)
    }
}

/// Pull the `results` array out of an upstream payload. A missing field is an
/// empty result set; anything that is not an object with an array there is an error.
fn extract_results(body: Value) -> Result<Vec<Value>> {
    let Value::Object(mut fields) = body else {
        return Err(anyhow!("response body is not a JSON object"));
    };

    match fields.remove("results") {
        None => Ok(Vec::new()),
        Some(Value::Array(results)) => Ok(results),
        Some(_) => Err(anyhow!("`results` is not an array")),
    }
}

#[async_trait::async_trait]
impl MovieSource for HttpMovieSource {
    async fn fetch_movies(&self) -> Option<Vec<Value>> {
        for attempt in 1..=self.policy.max_attempts {
            match self.attempt().await {
                Ok(results) => {
                    log::debug!(
                        "Fetched {} movies from external API on attempt {}",
                        results.len(),
                        attempt
                    );
                    return Some(results);
                }
                Err(e) => {
                    log::warn!(
                        "Failed to fetch movies from external API (attempt {}/{}): {:#}",
                        attempt,
                        self.policy.max_attempts,
                        e
                    );
                }
            }
            tokio::time::sleep(self.policy.backoff).await;
        }

        log::error!(
            "Giving up on external movie API after {} attempts",
            self.policy.max_attempts
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode as AxumStatus, routing::get, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::net::TcpListener;

    const TEST_BACKOFF: Duration = Duration::from_millis(50);

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            timeout: Duration::from_secs(2),
            backoff: TEST_BACKOFF,
        }
    }

    /// Serve a fake upstream that fails the first `failures` requests with 503.
    /// Returns the URL and the shared hit counter.
    async fn spawn_upstream(failures: u32) -> (String, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();

        let app = Router::new().route(
            "/movies/",
            get(move || {
                let counter = counter.clone();
                async move {
                    let seen = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if seen <= failures {
                        return Err(AxumStatus::SERVICE_UNAVAILABLE);
                    }
                    Ok(Json(json!({
                        "count": 2,
                        "results": [
                            {"uuid": "a", "title": "Heat"},
                            {"uuid": "b", "title": "Ronin"}
                        ]
                    })))
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/movies/", addr), hits)
    }

    #[tokio::test]
    async fn test_returns_results_on_first_success() {
        let (url, hits) = spawn_upstream(0).await;
        let source = HttpMovieSource::new(url, fast_policy(), false).unwrap();

        let movies = source.fetch_movies().await.expect("upstream is healthy");
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0]["title"], "Heat");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let (url, hits) = spawn_upstream(2).await;
        let source = HttpMovieSource::new(url, fast_policy(), false).unwrap();

        let started = Instant::now();
        let movies = source.fetch_movies().await;

        assert_eq!(movies.map(|m| m.len()), Some(2));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() >= TEST_BACKOFF * 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_three_failures() {
        let (url, hits) = spawn_upstream(u32::MAX).await;
        let source = HttpMovieSource::new(url, fast_policy(), false).unwrap();

        assert!(source.fetch_movies().await.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    /// Serve a fake upstream whose first `slow` requests stall for `delay`
    async fn spawn_stalling_upstream(slow: u32, delay: Duration) -> (String, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();

        let app = Router::new().route(
            "/movies/",
            get(move || {
                let counter = counter.clone();
                async move {
                    let seen = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if seen <= slow {
                        tokio::time::sleep(delay).await;
                    }
                    Json(json!({"results": [{"title": "Heat"}]}))
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/movies/", addr), hits)
    }

    fn short_timeout_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            timeout: Duration::from_millis(100),
            backoff: TEST_BACKOFF,
        }
    }

    #[tokio::test]
    async fn test_stalled_attempt_times_out_and_is_retried() {
        let (url, hits) = spawn_stalling_upstream(1, Duration::from_secs(5)).await;
        let source = HttpMovieSource::new(url, short_timeout_policy(), false).unwrap();

        let started = Instant::now();
        let movies = source.fetch_movies().await;

        assert_eq!(movies.map(|m| m.len()), Some(1));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(started.elapsed() >= Duration::from_millis(100) + TEST_BACKOFF);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_upstream_that_always_stalls_is_absent() {
        let (url, hits) = spawn_stalling_upstream(u32::MAX, Duration::from_secs(5)).await;
        let source = HttpMovieSource::new(url, short_timeout_policy(), false).unwrap();

        let started = Instant::now();
        assert!(source.fetch_movies().await.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_absent() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpMovieSource::new(format!("http://{}/movies/", addr), fast_policy(), false).unwrap();
        assert!(source.fetch_movies().await.is_none());
    }

    #[tokio::test]
    async fn test_sends_basic_auth() {
        let app = Router::new().route(
            "/movies/",
            get(|headers: HeaderMap| async move {
                // "user:secret" in base64
                match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                    Some("Basic dXNlcjpzZWNyZXQ=") => Ok(Json(json!({"results": [{"title": "ok"}]}))),
                    _ => Err(AxumStatus::UNAUTHORIZED),
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let url = format!("http://{}/movies/", addr);
        let anonymous = HttpMovieSource::new(url.clone(), fast_policy(), false).unwrap();
        let authed = HttpMovieSource::new(url, fast_policy(), false)
            .unwrap()
            .with_basic_auth("user".to_string(), Some("secret".to_string()));

        assert!(anonymous.fetch_movies().await.is_none());
        assert_eq!(authed.fetch_movies().await.map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_extract_results() {
        assert_eq!(extract_results(json!({"results": [1, 2]})).unwrap().len(), 2);
        assert!(extract_results(json!({"count": 0})).unwrap().is_empty());
        assert!(extract_results(json!({"results": "nope"})).is_err());
        assert!(extract_results(json!([1, 2])).is_err());
    }

    #[test]
    fn test_from_config_applies_policy() {
        let config = MovieApiConfig {
            username: Some("user".to_string()),
            password: Some("secret".to_string()),
            backoff_secs: 0,
            ..Default::default()
        };

        let source = HttpMovieSource::from_config(&config).unwrap();
        assert_eq!(source.policy().max_attempts, 3);
        assert_eq!(source.policy().backoff, Duration::ZERO);
        assert!(source.credentials.is_some());
    }
}
