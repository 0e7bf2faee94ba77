use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {container}/{key}")]
    NotFound { container: String, key: String },

    #[error("Access denied: {container}/{key}")]
    AccessDenied { container: String, key: String },

    #[error("Storage provider error {code}: {message}")]
    Provider { code: String, message: String },

    #[error("Object size {size} exceeds maximum {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to read object body: {0}")]
    Body(String),
}

impl StorageError {
    /// Build an error from a provider error code, folding the well-known
    /// codes into their dedicated variants.
    pub fn from_code(code: &str, message: impl Into<String>, container: &str, key: &str) -> Self {
        match code {
            "NoSuchKey" | "NotFound" => StorageError::NotFound {
                container: container.to_string(),
                key: key.to_string(),
            },
            "AccessDenied" | "Forbidden" => StorageError::AccessDenied {
                container: container.to_string(),
                key: key.to_string(),
            },
            _ => StorageError::Provider {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn code(&self) -> &str {
        match self {
            StorageError::NotFound { .. } => "NoSuchKey",
            StorageError::AccessDenied { .. } => "AccessDenied",
            StorageError::Provider { code, .. } => code,
            StorageError::TooLarge { .. } => "EntityTooLarge",
            StorageError::Body(_) => "BodyReadError",
        }
    }
}
