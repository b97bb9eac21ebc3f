//! Backup payload envelope: metadata accompanying a sealed artifact
//!
//! The envelope travels with a container through transport and storage but is
//! not itself encrypted by the codec. Identity fields belong to the archive
//! system; the codec never reads or validates them beyond presence.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::CodecError;

/// Encryption parameters for an envelope-encryption scheme wrapping a sealed
/// artifact. Data-only; the salted-CBC codec produces none of these itself
/// (in particular it has no authentication tag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionInfo {
    /// Cipher label, e.g. "aes-256-cbc"
    pub algorithm: String,
    /// Wrapped (encrypted) data key, base64
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped_key: Option<String>,
    /// Outer-scheme IV, base64
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    /// Outer-scheme authentication tag, base64
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_tag: Option<String>,
}

impl EncryptionInfo {
    /// Parameters for an artifact sealed by the salted-CBC container codec.
    /// Salt and IV live inside the container, so only the cipher label is
    /// recorded here.
    pub fn salted_cbc() -> Self {
        Self {
            algorithm: "aes-256-cbc".into(),
            wrapped_key: None,
            iv: None,
            auth_tag: None,
        }
    }
}

/// Metadata record describing a backed-up file.
///
/// Identity fields are required at construction and immutable afterwards.
/// `encryption` is present only when the artifact is encrypted; a payload
/// produced under the passthrough cipher carries none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupPayload {
    version: u32,
    tenant_id: String,
    file_id: String,
    blob_id: String,
    archive_item_id: String,
    /// Creation time, Unix seconds
    created_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    encryption: Option<EncryptionInfo>,
}

impl BackupPayload {
    /// Create an envelope. All four identity fields must be non-empty.
    pub fn new(
        tenant_id: impl Into<String>,
        file_id: impl Into<String>,
        blob_id: impl Into<String>,
        archive_item_id: impl Into<String>,
        encryption: Option<EncryptionInfo>,
    ) -> Result<Self, CodecError> {
        let payload = Self {
            version: 1,
            tenant_id: tenant_id.into(),
            file_id: file_id.into(),
            blob_id: blob_id.into(),
            archive_item_id: archive_item_id.into(),
            created_at: unix_now(),
            encryption,
        };

        for (name, value) in [
            ("tenant_id", &payload.tenant_id),
            ("file_id", &payload.file_id),
            ("blob_id", &payload.blob_id),
            ("archive_item_id", &payload.archive_item_id),
        ] {
            if value.is_empty() {
                return Err(CodecError::Envelope(format!("{name} must not be empty")));
            }
        }

        Ok(payload)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn blob_id(&self) -> &str {
        &self.blob_id
    }

    pub fn archive_item_id(&self) -> &str {
        &self.archive_item_id
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn encryption(&self) -> Option<&EncryptionInfo> {
        self.encryption.as_ref()
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| anyhow::anyhow!("envelope serialization: {e}"))
    }

    /// Deserialize from JSON bytes
    pub fn from_bytes(data: &[u8]) -> anyhow::Result<Self> {
        serde_json::from_slice(data).map_err(|e| anyhow::anyhow!("envelope deserialization: {e}"))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_roundtrip() {
        let payload = BackupPayload::new(
            "tenant-1",
            "file-abc",
            "blob-123",
            "item-9",
            Some(EncryptionInfo::salted_cbc()),
        )
        .unwrap();

        let bytes = payload.to_bytes().unwrap();
        let restored = BackupPayload::from_bytes(&bytes).unwrap();

        assert_eq!(restored.version(), 1);
        assert_eq!(restored.tenant_id(), "tenant-1");
        assert_eq!(restored.file_id(), "file-abc");
        assert_eq!(restored.blob_id(), "blob-123");
        assert_eq!(restored.archive_item_id(), "item-9");
        assert_eq!(restored.created_at(), payload.created_at());
        assert_eq!(
            restored.encryption().map(|e| e.algorithm.as_str()),
            Some("aes-256-cbc")
        );
    }

    #[test]
    fn test_empty_identity_field_rejected() {
        let result = BackupPayload::new("tenant-1", "", "blob-123", "item-9", None);
        assert!(matches!(result, Err(CodecError::Envelope(_))));

        let result = BackupPayload::new("", "file", "blob", "item", None);
        assert!(matches!(result, Err(CodecError::Envelope(_))));
    }

    #[test]
    fn test_plaintext_payload_has_no_encryption_record() {
        let payload = BackupPayload::new("t", "f", "b", "i", None).unwrap();
        assert!(payload.encryption().is_none());

        // Absent sub-record stays absent on the wire
        let json = String::from_utf8(payload.to_bytes().unwrap()).unwrap();
        assert!(!json.contains("encryption"));
    }

    #[test]
    fn test_salted_cbc_info_has_no_outer_scheme_fields() {
        let info = EncryptionInfo::salted_cbc();
        assert_eq!(info.algorithm, "aes-256-cbc");
        assert!(info.wrapped_key.is_none());
        assert!(info.iv.is_none());
        assert!(info.auth_tag.is_none());
    }
}
