use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub aws: AwsConfig,
    pub server: ServerConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub s3_bucket: Option<String>,
    pub dynamodb_table: Option<String>,
}

impl AwsConfig {
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Static credentials, only when both halves are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(key), Some(secret)) => Some((key.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub path: String,
    /// Maximum size of one log file in megabytes
    pub size: u64,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            path: "logs/recruitment-backend.log".to_string(),
            size: 10,
            max_files: 5,
        }
    }
}

impl Config {
    /// Override fields from environment-style variables
    ///
    /// `lookup` returns the value for a variable name, which keeps tests
    /// independent of the process environment.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("AWS_ACCESS_KEY_ID") {
            self.aws.access_key_id = Some(v);
        }
        if let Some(v) = var("AWS_SECRET_ACCESS_KEY") {
            self.aws.secret_access_key = Some(v);
        }
        if let Some(v) = var("AWS_DEFAULT_REGION") {
            self.aws.region = Some(v);
        }
        if let Some(v) = var("AWS_ENDPOINT_URL") {
            self.aws.endpoint = Some(v);
        }
        if let Some(v) = var("AWS_S3_BUCKET_NAME") {
            self.aws.s3_bucket = Some(v);
        }
        if let Some(v) = var("AWS_DYNAMODB_TABLE") {
            self.aws.dynamodb_table = Some(v);
        }

        if let Some(v) = var("APP_HOST") {
            self.server.host = v;
        }
        if let Some(v) = var("APP_PORT") {
            self.server.port = v
                .trim()
                .parse()
                .with_context(|| format!("APP_PORT must be a valid port number, got '{}'", v))?;
        }

        let level = var("LOG_LEVEL");
        let path = var("LOG_FILE");
        let size = var("LOG_MAX_SIZE_MB");
        let max_files = var("LOG_MAX_FILES");
        if level.is_some() || path.is_some() || size.is_some() || max_files.is_some() {
            let logging = self.logging.get_or_insert_with(LoggingConfig::default);
            if let Some(v) = level {
                logging.level = v;
            }
            if let Some(v) = path {
                logging.path = v;
            }
            if let Some(v) = size {
                logging.size = v
                    .trim()
                    .parse()
                    .with_context(|| format!("LOG_MAX_SIZE_MB must be a number, got '{}'", v))?;
            }
            if let Some(v) = max_files {
                logging.max_files = v
                    .trim()
                    .parse()
                    .with_context(|| format!("LOG_MAX_FILES must be a number, got '{}'", v))?;
            }
        }

        Ok(())
    }
}

/// Parse a TOML configuration file
pub fn load_config_file(path: &str) -> Result<Config> {
    let config_text = fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: Config =
        toml::from_str(&config_text).with_context(|| format!("Failed to parse {}", path))?;
    Ok(config)
}

/// Load configuration: `.env`, then the optional TOML file, then environment overrides
pub fn load_config(path: Option<&str>) -> Result<Config> {
    dotenvy::dotenv().ok();

    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None => Config::default(),
    };
    config.apply_env_from(|name| std::env::var(name).ok())?;

    Ok(config)
}
