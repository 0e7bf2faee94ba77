use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct S3Config {
    /// Falls back to the region from the default provider chain
    pub region: Option<String>,
}
