use serde_json::{Map, Value};
use std::sync::Arc;

use crate::accounts::{parse_resource_locator, AccountTable, RESOURCE_TYPES};
use crate::services::media_client::{DeleteResources, MediaApi, MediaApiError, MediaResponse};

pub const DEFAULT_RESOURCE_TYPE: &str = "image";
pub const DEFAULT_ACCESS_TYPE: &str = "upload";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Media account credentials are not configured for this request")]
    CredentialsUnavailable,
    #[error("Upstream deletion failed: {0}")]
    Upstream(#[from] MediaApiError),
}

/// Inbound deletion body as the caller sent it. Text fields that are missing,
/// blank or not strings are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeletionRequest {
    pub public_id: Option<String>,
    pub tenant_id: Option<String>,
    pub resource_url: Option<String>,
    pub resource_type: Option<String>,
    pub access_type: Option<String>,
    pub invalidate: Option<Value>,
}

impl DeletionRequest {
    /// Lenient extraction from an arbitrary JSON value; anything that is not an
    /// object yields an empty request
    pub fn from_json(value: &Value) -> Self {
        let Some(body) = value.as_object() else {
            return Self::default();
        };

        Self {
            public_id: text_field(body, &["public_id"]),
            tenant_id: text_field(body, &["tenant_id", "cloud_name"]),
            resource_url: text_field(body, &["resource_url", "secure_url", "url"]),
            resource_type: text_field(body, &["resource_type"]),
            access_type: text_field(body, &["access_type", "type"]),
            invalidate: body.get("invalidate").cloned(),
        }
    }
}

/// First non-blank string value among `keys`, trimmed
fn text_field(body: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Request after validation, derivation and defaulting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDeletion {
    pub public_id: String,
    pub tenant_id: Option<String>,
    pub resource_type: String,
    pub access_type: String,
    pub invalidate: bool,
}

impl NormalizedDeletion {
    pub fn from_request(request: DeletionRequest) -> Result<Self, RelayError> {
        let DeletionRequest {
            public_id,
            mut tenant_id,
            resource_url,
            mut resource_type,
            mut access_type,
            invalidate,
        } = request;

        let public_id =
            public_id.ok_or_else(|| RelayError::InvalidRequest("public_id is required".to_string()))?;

        let needs_derivation =
            tenant_id.is_none() || resource_type.is_none() || access_type.is_none();
        if let (true, Some(url)) = (needs_derivation, resource_url.as_deref()) {
            let derived = parse_resource_locator(url);
            if derived.is_empty() {
                tracing::debug!(resource_url = %url, "Resource URL did not match the delivery pattern");
            }
            tenant_id = tenant_id.or(derived.tenant_id);
            resource_type = resource_type.or(derived.resource_type);
            access_type = access_type.or(derived.access_type);
        }

        let resource_type = resource_type.unwrap_or_else(|| DEFAULT_RESOURCE_TYPE.to_string());
        if !RESOURCE_TYPES.contains(&resource_type.as_str()) {
            return Err(RelayError::InvalidRequest(
                "resource_type must be \"image\" or \"video\"".to_string(),
            ));
        }

        // "." and ".." would collapse out of the outbound path
        let access_type = access_type.unwrap_or_else(|| DEFAULT_ACCESS_TYPE.to_string());
        if access_type == "." || access_type == ".." {
            return Err(RelayError::InvalidRequest("access_type is invalid".to_string()));
        }

        Ok(Self {
            public_id,
            tenant_id,
            resource_type,
            access_type,
            invalidate: !matches!(invalidate, Some(Value::Bool(false))),
        })
    }
}

#[derive(Clone)]
pub struct DeletionRelay {
    accounts: Arc<AccountTable>,
    media: Arc<dyn MediaApi>,
}

impl DeletionRelay {
    pub fn new(accounts: Arc<AccountTable>, media: Arc<dyn MediaApi>) -> Self {
        Self { accounts, media }
    }

    pub async fn delete(&self, request: DeletionRequest) -> Result<MediaResponse, RelayError> {
        let normalized = NormalizedDeletion::from_request(request)?;

        let account = self
            .accounts
            .resolve_with_fallback(normalized.tenant_id.as_deref())
            .filter(|account| account.is_usable())
            .ok_or(RelayError::CredentialsUnavailable)?;

        tracing::debug!(
            requested_tenant = ?normalized.tenant_id,
            resolved_tenant = %account.tenant_id,
            "Resolved media account"
        );

        let outbound = DeleteResources {
            resource_type: normalized.resource_type,
            access_type: normalized.access_type,
            public_id: normalized.public_id,
            invalidate: normalized.invalidate,
        };

        let response = self.media.delete_resources(account, &outbound).await?;

        tracing::info!(
            tenant_id = %account.tenant_id,
            resource_type = %outbound.resource_type,
            access_type = %outbound.access_type,
            invalidate = outbound.invalidate,
            "Media deleted"
        );

        Ok(response)
    }
}
