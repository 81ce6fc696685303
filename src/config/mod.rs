use serde::{Deserialize, Serialize};
use std::env;

use crate::accounts::{Account, AccountTable};

pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudinary.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub media: MediaConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub api_base_url: String,
    /// Raw JSON of the tenant -> credentials mapping, parsed by `AccountTable::from_json`
    #[serde(skip_serializing)]
    pub accounts_json: Option<String>,
    pub default_tenant_id: Option<String>,
    #[serde(skip_serializing)]
    pub default_api_key: Option<String>,
    #[serde(skip_serializing)]
    pub default_api_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from a key lookup (the process environment in production,
    /// a fixture map in tests)
    fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("MEDIA_RELAY_BIND") {
            self.server.bind = v;
        }
        if let Some(port) = lookup("MEDIA_RELAY_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Media overrides
        if let Some(v) = lookup("MEDIA_API_BASE_URL") {
            self.media.api_base_url = v.trim_end_matches('/').to_string();
        }
        self.media.accounts_json = lookup("MEDIA_ACCOUNTS").or(self.media.accounts_json);
        self.media.default_tenant_id = non_blank(lookup("MEDIA_DEFAULT_TENANT_ID"));
        self.media.default_api_key = non_blank(lookup("MEDIA_DEFAULT_API_KEY"));
        self.media.default_api_secret = non_blank(lookup("MEDIA_DEFAULT_API_SECRET"));

        // Security overrides
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 3000,
            },
            media: MediaConfig::default(),
            security: SecurityConfig { enable_cors: true },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
            },
            media: MediaConfig::default(),
            security: SecurityConfig { enable_cors: false },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }

    /// Build the immutable account table from the configured mapping and the
    /// optional default account. Never fails: a malformed mapping yields an
    /// empty table.
    pub fn account_table(&self) -> AccountTable {
        let default = self.media.default_tenant_id.as_ref().map(|tenant_id| Account {
            tenant_id: tenant_id.clone(),
            api_key: self.media.default_api_key.clone().unwrap_or_default(),
            api_secret: self.media.default_api_secret.clone().unwrap_or_default(),
        });

        match self.media.accounts_json.as_deref() {
            Some(raw) => AccountTable::from_json(raw, default),
            None => AccountTable::new(Default::default(), default),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            accounts_json: None,
            default_tenant_id: None,
            default_api_key: None,
            default_api_secret: None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
