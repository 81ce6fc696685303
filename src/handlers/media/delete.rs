// handlers/media/delete.rs - POST /deleteMedia handler

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::DeletionRequest;

/// POST /deleteMedia - delete one asset on the remote media service
///
/// The body is read as raw bytes and parsed leniently so that a malformed or
/// partial body still produces the fixed `{error}` responses instead of an
/// extractor rejection. On success the remote body is returned as-is, under
/// the remote's own content type.
pub async fn delete_media(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload: Value = serde_json::from_slice(&body).unwrap_or_else(|e| {
        tracing::debug!("Unparseable deleteMedia body: {}", e);
        Value::Null
    });
    let request = DeletionRequest::from_json(&payload);

    let span = tracing::info_span!(
        "delete_media",
        request_id = %Uuid::new_v4(),
        public_id = request.public_id.as_deref().unwrap_or("")
    );

    let media = state.relay.delete(request).instrument(span).await?;
    let content_type = media
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok());

    let mut response = (StatusCode::OK, media.body).into_response();
    match content_type {
        Some(value) => {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        None => {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
    }

    Ok(response)
}
