//! Configuration structures for the fintel pipeline.

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;

/// Main configuration for the fintel pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FintelConfig {
    /// OCR engine invocation configuration.
    pub engine: EngineConfig,

    /// Dashboard server configuration.
    pub server: ServerConfig,
}

/// Dashboard server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the dashboard binds to.
    pub bind_addr: String,

    /// Reject uploads larger than this many bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7450".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl FintelConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
