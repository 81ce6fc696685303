use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::accounts::Account;

/// One normalized asset deletion, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResources {
    pub resource_type: String,
    pub access_type: String,
    pub public_id: String,
    pub invalidate: bool,
}

/// Wire body of the outbound DELETE
#[derive(Debug, Serialize)]
struct DeleteBody<'a> {
    public_ids: [&'a str; 1],
    invalidate: bool,
}

/// Successful reply from the remote service, kept as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResponse {
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Remote service returned {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("Invalid media API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Invalid endpoint path segment: {0:?}")]
    InvalidPathSegment(String),
}

/// Outbound seam for the remote media-management API
#[async_trait]
pub trait MediaApi: Send + Sync {
    async fn delete_resources(
        &self,
        account: &Account,
        request: &DeleteResources,
    ) -> Result<MediaResponse, MediaApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpMediaClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpMediaClient {
    /// Parse the base URL up front; it must be able to carry path segments
    pub fn new(base_url: &str) -> Result<Self, MediaApiError> {
        let invalid = || MediaApiError::InvalidBaseUrl(base_url.to_string());
        let base_url = Url::parse(base_url).map_err(|_| invalid())?;
        if base_url.cannot_be_a_base() {
            return Err(invalid());
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// `{base}/v1_1/{tenant}/resources/{resource_type}/{access_type}`, each
    /// segment percent-encoded. Dot segments are refused: `url` would drop
    /// them and silently address a shorter path.
    pub fn endpoint(&self, tenant_id: &str, request: &DeleteResources) -> Result<Url, MediaApiError> {
        let segments = [
            tenant_id,
            request.resource_type.as_str(),
            request.access_type.as_str(),
        ];
        if let Some(bad) = segments.iter().find(|s| s.is_empty() || **s == "." || **s == "..") {
            return Err(MediaApiError::InvalidPathSegment(bad.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MediaApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "v1_1",
                tenant_id,
                "resources",
                request.resource_type.as_str(),
                request.access_type.as_str(),
            ]);

        Ok(url)
    }
}

#[async_trait]
impl MediaApi for HttpMediaClient {
    async fn delete_resources(
        &self,
        account: &Account,
        request: &DeleteResources,
    ) -> Result<MediaResponse, MediaApiError> {
        let url = self.endpoint(&account.tenant_id, request)?;

        tracing::debug!(%url, public_id = %request.public_id, "Sending delete request");

        let response = self
            .client
            .delete(url)
            .basic_auth(&account.api_key, Some(&account.api_secret))
            .json(&DeleteBody {
                public_ids: [request.public_id.as_str()],
                invalidate: request.invalidate,
            })
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MediaApiError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(MediaResponse { content_type, body })
    }
}
