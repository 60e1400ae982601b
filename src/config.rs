use axum::http::HeaderValue;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use portfolio_notification::EmailConfig;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub mail: EmailConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the relay from a browser. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (MAIL_USER, MAIL_PASS, MAIL_TO, PORT)
    /// 2. Prefixed environment variables (PORTFOLIO__MAIL__USER, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("PORTFOLIO")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.allowed_origins")
                .try_parsing(true),
        );

        if let Ok(user) = env::var("MAIL_USER") {
            builder = builder.set_override("mail.user", user)?;
        }
        if let Ok(password) = env::var("MAIL_PASS") {
            builder = builder.set_override("mail.password", password)?;
        }
        if let Ok(to) = env::var("MAIL_TO") {
            builder = builder.set_override("mail.to", to)?;
        }
        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.mail.user.is_empty() {
            return Err("Mail user (relay mailbox) must be configured".to_string());
        }
        if self.mail.password.is_empty() {
            return Err("Mail password must be configured".to_string());
        }
        if self.mail.timeout_secs == 0 {
            return Err("Mail timeout must be greater than 0 seconds".to_string());
        }
        for origin in &self.server.allowed_origins {
            if origin.is_empty() || HeaderValue::from_str(origin).is_err() {
                return Err(format!("Invalid CORS origin: {origin:?}"));
            }
        }
        Ok(())
    }
}
