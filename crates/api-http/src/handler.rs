//! HTTP Method Handlers

use crate::error::{to_api_error, ApiError};
use crate::rate_limiter::RateLimiter;
use crate::types::{HealthResponse, ListResponse, MessageResponse, SubmitForm};
use axum::extract::State;
use axum::{Form, Json};
use relayq_core::application::SubmissionService;
use relayq_core::domain::QueueItem;
use std::sync::Arc;
use tracing::{error, warn};

/// Shared handler state with injected dependencies
#[derive(Clone)]
pub struct AppState {
    pub submissions: Arc<SubmissionService>,
    pub rate_limiter: Arc<RateLimiter>,
}

/// POST /urls
pub async fn submit_url(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Rate limiting check (DoS protection)
    if !state.rate_limiter.check() {
        warn!("Submission rate limit exceeded");
        return Err(ApiError::Throttled);
    }

    state.submissions.submit(&form.url).await.map_err(|e| {
        if e.is_client_error() {
            warn!(error = %e, "Rejected URL submission");
        } else {
            error!(error = %e, "Failed to save URL to queue");
        }
        to_api_error(e, "failed to save url")
    })?;

    Ok(Json(MessageResponse {
        message: "url saved".to_string(),
    }))
}

/// GET /urls
pub async fn list_urls(State(state): State<AppState>) -> Result<Json<ListResponse>, ApiError> {
    let items = state.submissions.pending().await.map_err(|e| {
        error!(error = %e, "Failed to read URLs from queue");
        to_api_error(e, "failed to list urls")
    })?;

    Ok(Json(ListResponse {
        urls: items.into_iter().map(QueueItem::into_url).collect(),
    }))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: relayq_core::VERSION.to_string(),
    })
}
