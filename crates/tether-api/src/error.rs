use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use tether_types::api::Payload;
use tether_types::error::{ApplicationError, INTERNAL, ServiceError};

/// Boundary translation of [`ServiceError`] into an HTTP response.
///
/// Application errors keep their code and message. Anything else is logged
/// here and answered with a generic 500.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl<E> From<E> for ApiError
where
    E: Into<ServiceError>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let app_err = match self.0 {
            ServiceError::Application(e) => e,
            ServiceError::Internal(e) => {
                error!("Internal error: {:#}", e);
                ApplicationError::new(INTERNAL, "Internal server error")
            }
        };

        let status = StatusCode::from_u16(app_err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(Payload::<()>::failure(&app_err))).into_response()
    }
}
