use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Browser-like identifier; several recipe sites reject default client agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Upper bound for `API_RATE_LIMIT` (requests per second per client)
pub const MAX_API_RATE_LIMIT: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub importer: ImporterConfig,
    pub uploads: UploadConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_rate_limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImporterConfig {
    pub user_agent: String,
    pub fetch_timeout_seconds: u64,
    pub image_timeout_seconds: u64,
    pub max_page_size: usize,
    pub max_image_size: usize,
    /// Skip the private/loopback host check on API import URLs, redirects
    /// and image downloads
    pub allow_private_hosts: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub api_default_limit: usize,
    pub api_max_limit: usize,
    pub max_request_body_size: usize,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_seconds: 20,
            image_timeout_seconds: 20,
            max_page_size: 5_242_880,
            max_image_size: 10_485_760,
            allow_private_hosts: false,
        }
    }
}

/// Read an environment variable, falling back to `default` when unset.
fn env_or<T: FromStr>(key: &str, default: &str) -> Result<T> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {key} value")))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/gastrobytes.db".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let user_agent =
            std::env::var("IMPORT_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "./data/uploads".to_string())
            .into();

        Ok(Settings {
            database: DatabaseConfig {
                url: database_url,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", "10")?,
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", "1")?,
                connection_timeout_seconds: env_or("DATABASE_CONNECTION_TIMEOUT", "30")?,
                idle_timeout_seconds: env_or("DATABASE_IDLE_TIMEOUT", "600")?,
            },
            server: ServerConfig {
                host,
                port: env_or("PORT", "5000")?,
                api_rate_limit: env_or("API_RATE_LIMIT", "20")?,
            },
            importer: ImporterConfig {
                user_agent,
                fetch_timeout_seconds: env_or("IMPORT_FETCH_TIMEOUT", "20")?,
                image_timeout_seconds: env_or("IMPORT_IMAGE_TIMEOUT", "20")?,
                max_page_size: env_or("MAX_PAGE_SIZE", "5242880")?,
                max_image_size: env_or("MAX_IMAGE_SIZE", "10485760")?,
                allow_private_hosts: env_or("ALLOW_PRIVATE_IMPORTS", "false")?,
            },
            uploads: UploadConfig { dir: upload_dir },
            pagination: PaginationConfig {
                api_default_limit: env_or("API_DEFAULT_LIMIT", "20")?,
                api_max_limit: env_or("API_MAX_LIMIT", "100")?,
                max_request_body_size: env_or("MAX_REQUEST_BODY_SIZE", "10485760")?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.server.api_rate_limit > MAX_API_RATE_LIMIT {
            return Err(Error::Config(format!(
                "API rate limit must be at most {MAX_API_RATE_LIMIT}"
            )));
        }

        if self.importer.fetch_timeout_seconds == 0 || self.importer.image_timeout_seconds == 0 {
            return Err(Error::Config(
                "Import timeouts must be non-zero".to_string(),
            ));
        }

        if self.pagination.api_max_limit == 0 {
            return Err(Error::Config("API max limit must be non-zero".to_string()));
        }

        Ok(())
    }
}
