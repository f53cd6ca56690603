use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Reference catalog served by the mock drug API
pub const DEFAULT_REFERENCE_URL: &str = "https://685daed17b57aebd2af6da54.mockapi.io/api/v1/drugs";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub reference: ReferenceConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted invoice file, in bytes
    pub max_file_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            reference: ReferenceConfig {
                url: DEFAULT_REFERENCE_URL.to_string(),
                timeout_secs: 30,
            },
            upload: UploadConfig {
                max_file_size: 10 * 1024 * 1024,
            },
        }
    }
}

impl AppConfig {
    /// Load from defaults, then `AUDIT__*` environment variables
    /// (e.g. `AUDIT__REFERENCE__URL`); a bare `PORT` overrides the server port.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Environment::with_prefix("AUDIT").separator("__"), std::env::var("PORT").ok())
    }

    fn load_from(env: Environment, port: Option<String>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("reference.url", defaults.reference.url)?
            .set_default("reference.timeout_secs", defaults.reference.timeout_secs)?
            .set_default("upload.max_file_size", defaults.upload.max_file_size as u64)?
            .add_source(env.try_parsing(true))
            .set_override_option("server.port", port)?
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
