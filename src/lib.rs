use serde::{Deserialize, Serialize};

pub mod batch;
pub mod error;
pub mod processing;
pub mod storage;

pub use error::{ConfigError, PipelineError};

/// Objects whose declared length exceeds this are rejected before decoding.
pub const MAX_IMAGE_SIZE: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Destination container for normalized images
    pub processed_bucket: String,
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Region override for the object store client
    #[serde(default)]
    pub storage_region: Option<String>,
}

fn default_image_width() -> u32 {
    800
}

fn default_image_height() -> u32 {
    600
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(::config::Environment::default())
    }

    /// Load configuration from an explicit environment source.
    ///
    /// Variable names are matched case-insensitively against the field
    /// names, so `PROCESSED_BUCKET` fills `processed_bucket`.
    pub fn from_environment(environment: ::config::Environment) -> Result<Self, ConfigError> {
        let config: Config = ::config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.processed_bucket.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "PROCESSED_BUCKET must not be empty".to_string(),
            ));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "target dimensions must be non-zero, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }

    pub fn storage(&self) -> storage::S3Config {
        storage::S3Config {
            region: self.storage_region.clone(),
        }
    }

    pub fn target_size(&self) -> processing::ImageSize {
        processing::ImageSize::new(self.image_width, self.image_height)
    }

    /// Map the configured verbosity onto a tracing level, defaulting to INFO
    pub fn tracing_level(&self) -> tracing::Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" | "warning" => tracing::Level::WARN,
            "error" | "critical" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(vars: &[(&str, &str)]) -> ::config::Environment {
        let source: ::config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ::config::Environment::default().source(Some(source))
    }

    #[test]
    fn test_defaults_applied() {
        let config =
            Config::from_environment(environment(&[("PROCESSED_BUCKET", "processed")])).unwrap();

        assert_eq!(config.processed_bucket, "processed");
        assert_eq!(config.image_width, 800);
        assert_eq!(config.image_height, 600);
        assert_eq!(config.log_level, "INFO");
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
        assert!(config.storage().region.is_none());
    }

    #[test]
    fn test_overrides_parsed() {
        let config = Config::from_environment(environment(&[
            ("PROCESSED_BUCKET", "out"),
            ("IMAGE_WIDTH", "320"),
            ("IMAGE_HEIGHT", "240"),
            ("LOG_LEVEL", "DEBUG"),
        ]))
        .unwrap();

        assert_eq!(config.image_width, 320);
        assert_eq!(config.image_height, 240);
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_missing_bucket_rejected() {
        let result = Config::from_environment(environment(&[("IMAGE_WIDTH", "100")]));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let result = Config::from_environment(environment(&[
            ("PROCESSED_BUCKET", "out"),
            ("IMAGE_HEIGHT", "0"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let config = Config::from_environment(environment(&[
            ("PROCESSED_BUCKET", "out"),
            ("LOG_LEVEL", "chatty"),
        ]))
        .unwrap();
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }
}
