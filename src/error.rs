use thiserror::Error;

use crate::storage::StorageError;

/// Failure of a single queue message or one of its records
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to fetch source object: {0}")]
    Fetch(StorageError),

    #[error("Image size {size} exceeds maximum {limit}")]
    SizeLimitExceeded { size: u64, limit: u64 },

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image transform failed: {0}")]
    Encode(String),

    #[error("Failed to write processed object: {0}")]
    Write(StorageError),

    #[error("Malformed message envelope: {0}")]
    EnvelopeParse(#[from] serde_json::Error),
}

impl PipelineError {
    /// Stable name of the failure class, used as a structured log field
    pub fn class(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "FetchError",
            PipelineError::SizeLimitExceeded { .. } => "SizeLimitExceeded",
            PipelineError::UnsupportedFormat(_) => "UnsupportedFormat",
            PipelineError::Encode(_) => "EncodeError",
            PipelineError::Write(_) => "WriteError",
            PipelineError::EnvelopeParse(_) => "EnvelopeParseError",
        }
    }

    /// Whether redelivery could plausibly succeed.
    ///
    /// Informational only: every failure marks its message for redelivery.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            PipelineError::SizeLimitExceeded { .. } | PipelineError::UnsupportedFormat(_)
        )
    }

    /// Provider error code for storage failures
    pub fn error_code(&self) -> Option<&str> {
        match self {
            PipelineError::Fetch(e) | PipelineError::Write(e) => Some(e.code()),
            _ => None,
        }
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(err: image::ImageError) -> Self {
        PipelineError::Encode(err.to_string())
    }
}

impl From<jpeg_encoder::EncodingError> for PipelineError {
    fn from(err: jpeg_encoder::EncodingError) -> Self {
        PipelineError::Encode(err.to_string())
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::Encode(format!("transform task failed: {}", err))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        let not_found = PipelineError::Fetch(StorageError::NotFound {
            container: "uploads".to_string(),
            key: "missing.jpg".to_string(),
        });
        assert_eq!(not_found.class(), "FetchError");
        assert_eq!(not_found.error_code(), Some("NoSuchKey"));
        assert!(not_found.is_retryable());

        let too_large = PipelineError::SizeLimitExceeded {
            size: 60 * 1024 * 1024,
            limit: crate::MAX_IMAGE_SIZE,
        };
        assert_eq!(too_large.class(), "SizeLimitExceeded");
        assert!(!too_large.is_retryable());
        assert_eq!(too_large.error_code(), None);

        let unsupported = PipelineError::UnsupportedFormat("TIFF".to_string());
        assert!(!unsupported.is_retryable());

        assert!(PipelineError::Encode("corrupt".to_string()).is_retryable());
    }

    #[test]
    fn test_size_limit_message() {
        let err = PipelineError::SizeLimitExceeded {
            size: 62914560,
            limit: 52428800,
        };
        assert_eq!(
            err.to_string(),
            "Image size 62914560 exceeds maximum 52428800"
        );
    }
}
