//! VmsClient - resilient access to the VMS HTTP API
//!
//! ## Responsibilities
//!
//! - Basic-auth requests against the VMS base URL
//! - Bounded retry with rate-limit backoff
//! - Typed wrappers for the endpoints the agent consumes

pub mod types;

use crate::error::{Error, Result};
use crate::time_codec;
use futures::StreamExt;
use reqwest::{Method, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use types::{
    CamerasResponse, EnumEntity, EnumsResponse, EventReport, LogEventsQuery, OutboundEvent,
    RawEvent, SearchRequest, SearchResponse,
};

/// Retries allowed after the initial attempt.
const RETRY_LIMIT: u32 = 3;

/// Backoff between attempts, both for transport failures and 429s.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Page cap for event search. The VMS silently drops later events in the
/// window; there is no pagination cursor in its search API.
const SEARCH_MAX_RESULTS: u32 = 20;

/// VMS HTTP client
pub struct VmsClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl VmsClient {
    /// Create a new client for the given VMS base URL.
    pub fn new(base_url: String, username: String, password: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
        }
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute one logical request under the retry contract.
    ///
    /// A connection failure, timeout or 429 response consumes one attempt
    /// and backs off for one second; at most [`RETRY_LIMIT`] retries follow
    /// the initial attempt. Any other non-2xx status fails immediately.
    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let mut request = self
                .http
                .request(method.clone(), url)
                .basic_auth(&self.username, Some(&self.password));
            if let Some(json) = body {
                request = request.json(json);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    tracing::debug!(url = %url, status = %status, attempt = attempts, "VMS response");
                    if status.is_success() {
                        return Ok(response);
                    }
                    if status != StatusCode::TOO_MANY_REQUESTS {
                        return Err(Error::UnexpectedStatus {
                            url: url.to_string(),
                            status,
                        });
                    }
                    tracing::warn!(url = %url, attempt = attempts, "VMS rate limited");
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    tracing::warn!(url = %url, attempt = attempts, error = %e, "VMS request failed");
                }
                Err(e) => return Err(Error::Http(e)),
            }

            if attempts > RETRY_LIMIT {
                return Err(Error::RetryLimitExceeded {
                    url: url.to_string(),
                    attempts,
                });
            }
            tokio::time::sleep(RETRY_BACKOFF).await;
        }
    }

    /// Retrieve the camera inventory.
    ///
    /// `GET /v2.0/cameras`
    pub async fn get_cameras(&self) -> Result<Vec<serde_json::Value>> {
        let url = format!("{}/v2.0/cameras", self.base_url);
        let response = self.execute(Method::GET, &url, None).await?;
        let parsed: CamerasResponse = response.json().await?;
        Ok(parsed.cameras)
    }

    /// Retrieve the entity enum descriptions with their supported event
    /// codes.
    ///
    /// `GET /v2.0/events/enums`
    pub async fn get_enums(&self) -> Result<Vec<EnumEntity>> {
        let url = format!("{}/v2.0/events/enums", self.base_url);
        let response = self.execute(Method::GET, &url, None).await?;
        let parsed: EnumsResponse = response.json().await?;
        Ok(parsed.entities)
    }

    /// Search events in a time window, most recent event last.
    ///
    /// `POST /v2.0/events/search`
    pub async fn search_events(
        &self,
        start_time_utc: &str,
        end_time_utc: &str,
        events: Vec<i32>,
        cameras: Option<Vec<String>>,
    ) -> Result<Vec<RawEvent>> {
        let url = format!("{}/v2.0/events/search", self.base_url);
        let request = SearchRequest {
            log_events: LogEventsQuery {
                start_time_utc: start_time_utc.to_string(),
                end_time_utc: end_time_utc.to_string(),
                events,
                include_server_events: true,
                max_results: SEARCH_MAX_RESULTS,
                cameras,
            },
        };

        let body = serde_json::to_value(&request)?;
        let response = self.execute(Method::POST, &url, Some(&body)).await?;
        let parsed: SearchResponse = response.json().await?;

        if parsed.events.len() as u32 >= SEARCH_MAX_RESULTS {
            tracing::warn!(
                count = parsed.events.len(),
                "Event search returned a full page; later events in the window are dropped"
            );
        }

        Ok(parsed.events)
    }

    /// Fetch a JPEG snapshot from a camera.
    ///
    /// `GET /v1.0/cameras/{id}/media?accept=image/jpeg`
    pub async fn camera_snapshot(&self, camera_id: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/v1.0/cameras/{}/media?accept=image/jpeg",
            self.base_url, camera_id
        );
        let response = self.execute(Method::GET, &url, None).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Download recorded video for a tick interval, streamed to `dest` in
    /// chunks.
    ///
    /// `GET /v1.0/cameras/{id}/videofilesdownload`
    pub async fn download_video(
        &self,
        camera_id: &str,
        start_ticks: i64,
        stop_ticks: i64,
        dest: &Path,
    ) -> Result<()> {
        let start = time_codec::format_utc(time_codec::ticks_to_utc(start_ticks));
        let stop = time_codec::format_utc(time_codec::ticks_to_utc(stop_ticks));
        let url = format!(
            "{}/v1.0/cameras/{}/videofilesdownload?accept=application/json&start={}&stop={}",
            self.base_url, camera_id, start, stop
        );

        let response = self.execute(Method::GET, &url, None).await?;
        let mut stream = response.bytes_stream();
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let data = chunk.map_err(Error::Http)?;
            file.write_all(&data).await?;
            written += data.len() as u64;
        }
        file.flush().await?;

        tracing::info!(
            camera_id = %camera_id,
            dest = %dest.display(),
            bytes = written,
            "Video downloaded"
        );
        Ok(())
    }

    /// Report integration-detected events back into the VMS.
    ///
    /// `POST /v2.0/events`
    pub async fn send_events(&self, events: Vec<OutboundEvent>) -> Result<()> {
        let url = format!("{}/v2.0/events", self.base_url);
        let body = serde_json::to_value(&EventReport { events })?;
        self.execute(Method::POST, &url, Some(&body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Json;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::Router;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String) -> VmsClient {
        VmsClient::new(base_url, "admin".to_string(), "secret".to_string())
    }

    /// Handler that returns 429 for the first `failures` hits, then 200.
    fn rate_limited_then_ok(failures: u32) -> (Router, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/v2.0/cameras",
            get(move || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if n <= failures {
                        (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response()
                    } else {
                        Json(serde_json::json!({"cameras": []})).into_response()
                    }
                }
            }),
        );
        (router, hits)
    }

    #[tokio::test]
    async fn rate_limit_then_success_retries_once() {
        let (router, hits) = rate_limited_then_ok(1);
        let base = serve(router).await;

        let cameras = client(base).get_cameras().await.expect("should succeed");
        assert!(cameras.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn three_failures_then_success_uses_four_attempts() {
        let (router, hits) = rate_limited_then_ok(3);
        let base = serve(router).await;

        client(base).get_cameras().await.expect("should succeed");
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn four_failures_exhaust_the_retry_budget() {
        let (router, hits) = rate_limited_then_ok(10);
        let base = serve(router).await;

        let err = client(base).get_cameras().await.expect_err("should fail");
        match err {
            Error::RetryLimitExceeded { attempts, .. } => assert_eq!(attempts, 4),
            other => panic!("expected RetryLimitExceeded, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn connection_refused_exhausts_the_retry_budget() {
        // Bind then drop to get a port nothing is listening on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let err = client(format!("http://{}", addr))
            .get_cameras()
            .await
            .expect_err("should fail");
        match err {
            Error::RetryLimitExceeded { attempts, .. } => assert_eq!(attempts, 4),
            other => panic!("expected RetryLimitExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_fails_immediately() {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/v2.0/cameras",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }),
        );
        let base = serve(router).await;

        let err = client(base).get_cameras().await.expect_err("should fail");
        match err {
            Error::UnexpectedStatus { status, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn search_posts_the_query_block_and_parses_events() {
        let router = Router::new().route(
            "/v2.0/events/search",
            post(|Json(body): Json<serde_json::Value>| async move {
                let query = &body["logEvents"];
                assert_eq!(query["includeServerEvents"], true);
                assert_eq!(query["maxResults"], 20);
                assert_eq!(query["events"], serde_json::json!([10, 11]));
                assert_eq!(query["cameras"], serde_json::json!(["cam-1"]));
                Json(serde_json::json!({
                    "events": [
                        {"type": 10, "time": 1000},
                        {"type": 11, "time": 2000}
                    ]
                }))
            }),
        );
        let base = serve(router).await;

        let events = client(base)
            .search_events(
                "2023-10-29T13:50:00Z",
                "2023-10-29T14:00:00Z",
                vec![10, 11],
                Some(vec!["cam-1".to_string()]),
            )
            .await
            .expect("search");

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, 10);
        assert_eq!(events[0].time, 1000);
        assert_eq!(events[1].event_type, 11);
        assert_eq!(events[1].time, 2000);
    }

    #[tokio::test]
    async fn download_streams_the_body_to_disk() {
        let router = Router::new().route(
            "/v1.0/cameras/cam-1/videofilesdownload",
            get(|| async { b"not really an avi".to_vec() }),
        );
        let base = serve(router).await;

        let dest = std::env::temp_dir().join(format!("vms-agent-dl-{}.avi", std::process::id()));
        client(base)
            .download_video("cam-1", 133_542_367_605_500_000, 133_542_368_605_500_000, &dest)
            .await
            .expect("download");

        let written = tokio::fs::read(&dest).await.expect("read back");
        assert_eq!(written, b"not really an avi");
        let _ = tokio::fs::remove_file(&dest).await;
    }
}
