//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::TransformerConfig;
use crate::encoding::TextEncoding;
use crate::{DEFAULT_KV_DELIMITER, DEFAULT_RECORD_SEPARATOR, DEFAULT_TIMESTAMP_WIDTH};

impl TransformerConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("SERIALIZER_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/serializer/config.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!(
                "Config file not found at {}, using environment variables",
                config_path
            );
            Self::from_env()
        };

        // Environment variables override file config
        if let Ok(sep) = std::env::var("SERIALIZER_RECORD_SEPARATOR") {
            config.record_separator = sep;
        }
        if let Some(delim) = std::env::var("SERIALIZER_KV_DELIMITER")
            .ok()
            .and_then(|s| s.chars().next())
        {
            config.kv_delimiter = delim;
        }
        if let Some(encoding) = std::env::var("SERIALIZER_ENCODING")
            .ok()
            .and_then(|s| TextEncoding::from_name(&s))
        {
            config.encoding = encoding;
        }
        if let Some(width) = std::env::var("SERIALIZER_TIMESTAMP_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timestamp_width = width;
        }
        if let Some(skip) = std::env::var("SERIALIZER_SKIP_EMPTY_SEGMENTS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.skip_empty_segments = skip;
        }

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: TransformerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        Self {
            record_separator: std::env::var("SERIALIZER_RECORD_SEPARATOR")
                .unwrap_or_else(|_| DEFAULT_RECORD_SEPARATOR.to_string()),
            kv_delimiter: std::env::var("SERIALIZER_KV_DELIMITER")
                .ok()
                .and_then(|s| s.chars().next())
                .unwrap_or(DEFAULT_KV_DELIMITER),
            encoding: std::env::var("SERIALIZER_ENCODING")
                .ok()
                .and_then(|s| TextEncoding::from_name(&s))
                .unwrap_or_default(),
            timestamp_width: std::env::var("SERIALIZER_TIMESTAMP_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMESTAMP_WIDTH),
            skip_empty_segments: std::env::var("SERIALIZER_SKIP_EMPTY_SEGMENTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        }
    }
}
