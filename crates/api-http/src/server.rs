//! HTTP Server
//!
//! Binds the submission/listing router and serves it until shutdown.

use crate::handler::{health, list_urls, submit_url, AppState};
use crate::rate_limiter::RateLimiter;
use axum::routing::{get, post};
use axum::Router;
use relayq_core::application::{ShutdownToken, SubmissionService};
use relayq_core::error::{AppError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_RATE_LIMIT_BURST: u32 = 200;
const DEFAULT_RATE_LIMIT_RATE: u32 = 100;

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit_burst: u32,
    pub rate_limit_per_sec: u32,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            rate_limit_per_sec: DEFAULT_RATE_LIMIT_RATE,
        }
    }
}

/// HTTP Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, submissions: Arc<SubmissionService>) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_burst,
            config.rate_limit_per_sec,
        ));
        Self {
            config,
            state: AppState {
                submissions,
                rate_limiter,
            },
        }
    }

    /// Routes with state attached
    pub fn router(&self) -> Router {
        Router::new()
            .route("/urls", post(submit_url).get(list_urls))
            .route("/health", get(health))
            .with_state(self.state.clone())
    }

    /// Bind and serve in the background until `shutdown` fires
    ///
    /// Returns the bound address (useful with port 0) and the serve task.
    pub async fn start(self, mut shutdown: ShutdownToken) -> Result<(SocketAddr, JoinHandle<()>)> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| {
                AppError::Config(format!("Failed to bind HTTP server on {}: {}", addr, e))
            })?;
        let local_addr = listener.local_addr()?;

        info!(addr = %local_addr, "HTTP server listening");

        let router = self.router();
        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.wait().await })
                .await;
            match result {
                Ok(()) => info!("HTTP server stopped"),
                Err(e) => error!(error = %e, "HTTP server failed"),
            }
        });

        Ok((local_addr, handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorResponse, HealthResponse, ListResponse, MessageResponse};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use relayq_core::application::shutdown_channel;
    use relayq_core::port::queue_store::mocks::InMemoryQueueStore;
    use relayq_core::port::QueueStore;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn server_with(store: Arc<InMemoryQueueStore>, config: ApiServerConfig) -> ApiServer {
        ApiServer::new(config, Arc::new(SubmissionService::new(store)))
    }

    fn submit_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/urls")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body<T: DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_submit_saves_url() {
        let store = Arc::new(InMemoryQueueStore::new());
        let router = server_with(store.clone(), ApiServerConfig::default()).router();

        let response = router
            .oneshot(submit_request("url=http%3A%2F%2Fa.test%2Fok"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = json_body(response).await;
        assert_eq!(body.message, "url saved");
        assert_eq!(store.range(0, 10).await.unwrap()[0].url(), "http://a.test/ok");
    }

    #[tokio::test]
    async fn test_submit_without_url_is_bad_request() {
        let store = Arc::new(InMemoryQueueStore::new());
        let router = server_with(store.clone(), ApiServerConfig::default()).router();

        for body in ["", "url=", "other=1"] {
            let response = router.clone().oneshot(submit_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
            let error: ErrorResponse = json_body(response).await;
            assert_eq!(error.error, "url not provided");
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_submit_rate_limited() {
        let store = Arc::new(InMemoryQueueStore::new());
        let config = ApiServerConfig {
            rate_limit_burst: 1,
            rate_limit_per_sec: 0,
            ..Default::default()
        };
        let router = server_with(store.clone(), config).router();

        let first = router.clone().oneshot(submit_request("url=a")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = router.oneshot(submit_request("url=b")).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_list_returns_pending_urls_oldest_first() {
        let urls: Vec<String> = (0..12).map(|i| format!("http://{}.test", i)).collect();
        let store = Arc::new(InMemoryQueueStore::with_urls(urls.clone()));
        let router = server_with(store, ApiServerConfig::default()).router();

        let response = router
            .oneshot(Request::get("/urls").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ListResponse = json_body(response).await;
        assert_eq!(body.urls, urls[..10].to_vec());
    }

    #[tokio::test]
    async fn test_health() {
        let store = Arc::new(InMemoryQueueStore::new());
        let router = server_with(store, ApiServerConfig::default()).router();

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: HealthResponse = json_body(response).await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn test_start_binds_and_stops_on_shutdown() {
        let store = Arc::new(InMemoryQueueStore::new());
        let config = ApiServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Default::default()
        };
        let (tx, token) = shutdown_channel();

        let (addr, handle) = server_with(store, config).start(token).await.unwrap();
        assert_ne!(addr.port(), 0);

        tx.shutdown();
        handle.await.unwrap();
    }
}
