use std::collections::HashMap;

/// Object read back from the store
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub bytes: Vec<u8>,
    /// Length reported by the store, which may differ from `bytes.len()`
    pub declared_length: u64,
    pub user_metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionMode {
    Aes256,
}

impl EncryptionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncryptionMode::Aes256 => "AES256",
        }
    }
}

/// Object write request
#[derive(Debug, Clone)]
pub struct PutObject {
    pub container: String,
    pub key: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub user_metadata: HashMap<String, String>,
    pub encryption: EncryptionMode,
}

impl PutObject {
    pub fn new(
        container: impl Into<String>,
        key: impl Into<String>,
        bytes: Vec<u8>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
            bytes,
            content_type: content_type.into(),
            user_metadata: HashMap::new(),
            encryption: EncryptionMode::Aes256,
        }
    }

    pub fn with_metadata(mut self, user_metadata: HashMap<String, String>) -> Self {
        self.user_metadata = user_metadata;
        self
    }

    pub fn with_encryption(mut self, encryption: EncryptionMode) -> Self {
        self.encryption = encryption;
        self
    }
}
