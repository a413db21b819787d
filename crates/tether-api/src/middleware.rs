use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use tether_types::error::ApplicationError;

use crate::error::ApiError;
use crate::state::AppState;

/// Reject requests whose Authorization header is not the shared access
/// token. A `Bearer ` prefix is accepted but not required.
pub async fn require_access_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v));

    if presented != Some(state.access_token.as_str()) {
        warn!("Rejected {} {}: bad access token", req.method(), req.uri().path());
        return Err(ApplicationError::unauthorized("Invalid access token").into());
    }

    Ok(next.run(req).await)
}
