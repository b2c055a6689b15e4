//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock sources injected, enabling E2E testing without upstream
//! services.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use streamrank_core::{
    testing::MockStreamSource, Config, RankingConfig, SlidingWindowConfig, SlidingWindowLimiter,
    SourceConfig, StreamSource, TtlCache,
};
use streamrank_server::state::AppState;

/// Re-export fixtures for test convenience
pub use streamrank_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with one primary and one best-effort
/// [`MockStreamSource`].
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_lookup() {
///     let fixture = TestFixture::new().await;
///     fixture.primary.set_streams(vec![fixtures::stream("1080p", 10, 2.0)]).await;
///
///     let response = fixture.get("/api/v1/streams/movie/tt0111161").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Primary source - its failures fail the request
    pub primary: Arc<MockStreamSource>,
    /// Best-effort source - its failures are reported and skipped
    pub secondary: Arc<MockStreamSource>,
    /// Shared state, for inspecting cache and limiter
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default settings.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let primary = Arc::new(MockStreamSource::new("primary").primary());
        let secondary = Arc::new(
            MockStreamSource::new("secondary").with_timeout(Duration::from_millis(200)),
        );

        let config = Config {
            ranking: test_config.ranking,
            sources: vec![
                SourceConfig {
                    name: "primary".to_string(),
                    base_url: "https://primary.example/secret-token".to_string(),
                    timeout_ms: 5_000,
                    primary: true,
                },
                SourceConfig {
                    name: "secondary".to_string(),
                    base_url: "https://secondary.example".to_string(),
                    timeout_ms: 200,
                    primary: false,
                },
            ],
            ..Default::default()
        };

        let cache = Arc::new(TtlCache::new(100, Duration::from_secs(60)));
        let limiter = Arc::new(SlidingWindowLimiter::new(SlidingWindowConfig {
            max_requests: test_config.max_requests,
            ..Default::default()
        }));

        let state = Arc::new(AppState::new(
            config,
            vec![
                Arc::clone(&primary) as Arc<dyn StreamSource>,
                Arc::clone(&secondary) as Arc<dyn StreamSource>,
            ],
            cache,
            limiter,
        ));

        let router = streamrank_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            primary,
            secondary,
            state,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Ranking defaults served when a request overrides nothing
    pub ranking: RankingConfig,
    /// Per-source admissions per window
    pub max_requests: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            ranking: RankingConfig::default(),
            max_requests: 30,
        }
    }
}

impl TestConfig {
    /// Create config with a tight rate limit.
    pub fn with_rate_limit(max_requests: usize) -> Self {
        Self {
            max_requests,
            ..Default::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
