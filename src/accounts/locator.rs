use url::Url;

/// Asset classes the relay addresses
pub const RESOURCE_TYPES: [&str; 2] = ["image", "video"];

/// Fields recoverable from a delivery URL such as
/// `https://res.example.com/<tenant>/image/upload/v1/folder/asset.jpg`.
/// Every field is absent when the URL does not have that shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLocator {
    pub tenant_id: Option<String>,
    pub resource_type: Option<String>,
    pub access_type: Option<String>,
}

impl ResourceLocator {
    pub fn is_empty(&self) -> bool {
        self.tenant_id.is_none() && self.resource_type.is_none() && self.access_type.is_none()
    }
}

/// Find the first `<tenant>/<image|video>/<access>/<rest>` run in the URL path.
pub fn parse_resource_locator(raw: &str) -> ResourceLocator {
    let Ok(url) = Url::parse(raw.trim()) else {
        return ResourceLocator::default();
    };
    let Some(segments) = url.path_segments() else {
        return ResourceLocator::default();
    };
    let segments: Vec<&str> = segments.collect();

    segments
        .windows(4)
        .find(|w| {
            !w[0].is_empty()
                && RESOURCE_TYPES.contains(&w[1])
                && !w[2].is_empty()
                && !w[3].is_empty()
        })
        .map(|w| ResourceLocator {
            tenant_id: Some(w[0].to_string()),
            resource_type: Some(w[1].to_string()),
            access_type: Some(w[2].to_string()),
        })
        .unwrap_or_default()
}
