// Route exports
pub mod account;
pub mod deck;

use crate::config::DeckConfig;
use crate::core::{DeckSettings, StaticCandidates};
use crate::models::{CommittedSwipe, ErrorResponse};
use crate::services::{AuthError, BackendClient, Claims, SessionStore, SwipeLedger, TokenVerifier};
use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub backend: Arc<BackendClient>,
    pub tokens: TokenVerifier,
    /// Absent when no database is configured
    pub ledger: Option<Arc<SwipeLedger>>,
    pub ledger_tx: Option<UnboundedSender<CommittedSwipe>>,
    /// Local candidate fixture; decks are filled from the backend without one
    pub fixture: Option<StaticCandidates>,
    pub deck: DeckConfig,
    pub deck_settings: DeckSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(deck::configure)
            .configure(account::configure),
    );
}

/// JSON error body used for extractor failures
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle malformed path segments (e.g. a session id that is not a UUID)
pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    JsonError {
        error: "not_found".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 404,
    }
    .into()
}

/// Raw bearer token from the request, if any
pub(crate) fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify the caller; `Err` carries the 401 response
pub(crate) fn require_auth(state: &AppState, req: &HttpRequest) -> Result<(Claims, String), HttpResponse> {
    let token = bearer_token(req).ok_or_else(|| unauthorized(&AuthError::MissingToken))?;
    let claims = state.tokens.verify(token).map_err(|e| unauthorized(&e))?;
    Ok((claims, token.to_string()))
}

/// Identify the caller when a token is supplied; anonymous otherwise.
///
/// A token that is present but invalid is still rejected.
pub(crate) fn optional_auth(state: &AppState, req: &HttpRequest) -> Result<Option<Claims>, HttpResponse> {
    match bearer_token(req) {
        Some(token) => state.tokens.verify(token).map(Some).map_err(|e| unauthorized(&e)),
        None => Ok(None),
    }
}

fn unauthorized(err: &AuthError) -> HttpResponse {
    tracing::debug!("Rejecting request: {}", err);
    HttpResponse::Unauthorized().json(ErrorResponse::new("Unauthorized", err.to_string(), 401))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_extraction() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc.def"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn test_json_error_status() {
        let err = JsonError {
            error: "invalid_json".to_string(),
            message: "bad".to_string(),
            status_code: 400,
        };
        let response = error::ResponseError::error_response(&err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
