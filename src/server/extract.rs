use axum::async_trait;
use axum::body::HttpBody;
use axum::extract::FromRequest;
use axum::http::Request;
use axum::{BoxError, Json};
use serde::de::DeserializeOwned;

use crate::error::EditorError;

/// `Json` whose rejections use the API's `{ "error": ... }` body.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = EditorError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| EditorError::Validation(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}
