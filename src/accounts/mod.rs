// accounts - tenant credential table and resource URL parsing
//
// The table is built once at start-up and shared read-only behind an Arc.
// Nothing in this module mutates it after construction.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

pub mod locator;

pub use locator::{parse_resource_locator, ResourceLocator, RESOURCE_TYPES};

/// Credentials for one media-hosting tenant
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub tenant_id: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Account {
    /// An account can sign requests only when every field is filled in
    pub fn is_usable(&self) -> bool {
        !self.tenant_id.trim().is_empty()
            && !self.api_key.trim().is_empty()
            && !self.api_secret.trim().is_empty()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("tenant_id", &self.tenant_id)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Shape of one entry in the configured mapping
#[derive(Debug, Deserialize)]
struct Credentials {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    api_secret: String,
}

#[derive(Debug, Clone, Default)]
pub struct AccountTable {
    accounts: HashMap<String, Account>,
    default: Option<Account>,
}

impl AccountTable {
    pub fn new(accounts: HashMap<String, Account>, default: Option<Account>) -> Self {
        if let Some(default) = &default {
            if accounts.contains_key(&default.tenant_id) {
                tracing::warn!(
                    tenant_id = %default.tenant_id,
                    "default account shares a tenant id with the account table; table entry takes precedence"
                );
            }
        }

        Self { accounts, default }
    }

    /// Parse a `{"<tenant_id>": {"api_key": "...", "api_secret": "..."}}` mapping.
    ///
    /// A mapping that does not parse leaves the table empty so the service can
    /// still run on the default account alone.
    pub fn from_json(raw: &str, default: Option<Account>) -> Self {
        let parsed: HashMap<String, Credentials> = match serde_json::from_str(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Ignoring malformed account table configuration: {}", e);
                HashMap::new()
            }
        };

        let accounts = parsed
            .into_iter()
            .map(|(tenant_id, creds)| {
                let account = Account {
                    tenant_id: tenant_id.clone(),
                    api_key: creds.api_key,
                    api_secret: creds.api_secret,
                };
                (tenant_id, account)
            })
            .collect();

        Self::new(accounts, default)
    }

    /// Exact, case-sensitive lookup: the table first, then the default account
    /// when its own tenant id matches.
    pub fn resolve(&self, tenant_id: Option<&str>) -> Option<&Account> {
        let tenant_id = tenant_id?;
        self.accounts.get(tenant_id).or_else(|| {
            self.default
                .as_ref()
                .filter(|account| account.tenant_id == tenant_id)
        })
    }

    /// Credential chain used by the deletion relay: the table entry, the
    /// default account bound to that tenant, then the default account as a
    /// plain fallback. The first candidate found is returned whether or not
    /// it is usable.
    pub fn resolve_with_fallback(&self, tenant_id: Option<&str>) -> Option<&Account> {
        self.resolve(tenant_id).or_else(|| self.default.as_ref())
    }

    pub fn default_account(&self) -> Option<&Account> {
        self.default.as_ref()
    }

    /// Tenant ids held in the table, sorted for stable output
    pub fn tenant_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.accounts.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
