use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration (loaded from shoebox.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoeboxConfig {
    pub backup: BackupConfig,
    pub log: LogConfig,
}

/// Which backup cipher variant is active for this deployment.
///
/// Selected once at startup; an unknown mode string in the config file is a
/// parse error, so misconfiguration fails at load time rather than per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionMode {
    /// Seal backups into the salted AES-256-CBC container format
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
    /// Pass backup bytes through unchanged (encryption disabled)
    #[serde(rename = "none")]
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Active cipher variant (default: aes-256-cbc)
    pub encryption: EncryptionMode,
    /// Directory sealed containers are written to
    pub output_dir: PathBuf,
    /// File extension for sealed containers (default: sbx)
    pub container_extension: String,
    /// Write a JSON envelope sidecar next to each sealed container
    pub write_envelope: bool,
    /// Tenant identifier stamped into envelopes
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            encryption: EncryptionMode::Aes256Cbc,
            output_dir: PathBuf::from("~/.local/share/shoebox/backups"),
            container_extension: "sbx".into(),
            write_envelope: true,
            tenant_id: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ShoeboxConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> crate::ShoeboxResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| {
                crate::ShoeboxError::Config(format!("parsing {}: {e}", path.display()))
            })
        } else {
            tracing::warn!("config file not found: {} (using defaults)", path.display());
            Ok(Self::default())
        }
    }
}
