use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use tether_types::error::ApplicationError;

use crate::error::ApiError;

/// `Json<T>` whose rejection goes through [`ApiError`], so a malformed body
/// is answered with a 40000 payload instead of axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(rejection).into()),
        }
    }
}

fn rejected(rejection: JsonRejection) -> ApplicationError {
    debug!("Rejected request body: {}", rejection.body_text());
    ApplicationError::bad_request("Invalid request body")
}
