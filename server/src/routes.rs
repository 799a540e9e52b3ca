//! HTTP routes.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use faq_search::{ScoredArticle, SearchError, SearchHandle};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Build the router. Requests are answered even before the search service
/// is ready; search endpoints then report `503`.
pub fn router(handle: SearchHandle) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/faq", get(faq))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(handle)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub name: String,
    pub version: String,
    pub ready: bool,
}

#[derive(Debug, Deserialize)]
pub struct FaqParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FaqResponse {
    pub question: String,
    pub results: Vec<ScoredArticle>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

async fn index(State(handle): State<SearchHandle>) -> Json<IndexResponse> {
    Json(IndexResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ready: handle.is_ready(),
    })
}

async fn faq(
    State(handle): State<SearchHandle>,
    params: Result<Query<FaqParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!("Rejected /faq query: {rejection}");
            return error_response(StatusCode::BAD_REQUEST, "Question is required");
        }
    };
    let Some(question) = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
    else {
        return error_response(StatusCode::BAD_REQUEST, "Question is required");
    };

    match handle.search(question).await {
        Ok(results) => Json(FaqResponse {
            question: question.to_string(),
            results,
        })
        .into_response(),
        Err(err) => search_error_response(&err),
    }
}

async fn healthz(State(handle): State<SearchHandle>) -> Response {
    match handle.get() {
        Some(service) => Json(service.stats()).into_response(),
        None => search_error_response(&SearchError::NotReady),
    }
}

/// HTTP status for a search failure.
pub fn status_for(err: &SearchError) -> StatusCode {
    match err {
        SearchError::EmptyQuery => StatusCode::BAD_REQUEST,
        err if err.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn search_error_response(err: &SearchError) -> Response {
    let status = status_for(err);
    if err.is_retryable() {
        warn!("Search unavailable: {err}");
    } else if status.is_server_error() {
        error!("Search failed: {err}");
    }
    error_response(status, err.to_string())
}
