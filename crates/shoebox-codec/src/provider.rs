//! Cipher variant selection: real AES-256-CBC codec vs passthrough
//!
//! The active variant is chosen once at startup from configuration and the
//! resulting [`BackupCipher`] is passed to every call-site that seals or
//! opens backups. There is no runtime toggle.

use secrecy::SecretString;

use shoebox_core::config::EncryptionMode;

use crate::container;
use crate::error::CodecError;

/// The backup cipher active for this deployment.
///
/// Exactly two variants exist: the production salted-CBC codec and an
/// identity passthrough for deployments with encryption disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupCipher {
    /// Salted AES-256-CBC container format
    Aes256Cbc,
    /// Identity: backup bytes pass through unchanged
    Passthrough,
}

impl BackupCipher {
    /// Select the cipher variant from configuration. Unknown variant names
    /// never reach this point; the config layer rejects them at parse time.
    pub fn from_config(mode: EncryptionMode) -> Self {
        match mode {
            EncryptionMode::Aes256Cbc => Self::Aes256Cbc,
            EncryptionMode::None => Self::Passthrough,
        }
    }

    /// Whether this variant actually encrypts.
    pub fn is_encrypting(&self) -> bool {
        matches!(self, Self::Aes256Cbc)
    }

    /// Seal plaintext under this variant. The passthrough variant ignores the
    /// passphrase and returns the input unchanged.
    pub fn seal(&self, plaintext: &[u8], passphrase: &SecretString) -> Vec<u8> {
        match self {
            Self::Aes256Cbc => container::seal(plaintext, passphrase),
            Self::Passthrough => plaintext.to_vec(),
        }
    }

    /// Open a sealed artifact under this variant.
    pub fn open(&self, data: &[u8], passphrase: &SecretString) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Aes256Cbc => container::open(data, passphrase),
            Self::Passthrough => Ok(data.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(s: &str) -> SecretString {
        SecretString::from(s)
    }

    #[test]
    fn test_from_config() {
        assert_eq!(
            BackupCipher::from_config(EncryptionMode::Aes256Cbc),
            BackupCipher::Aes256Cbc
        );
        assert_eq!(
            BackupCipher::from_config(EncryptionMode::None),
            BackupCipher::Passthrough
        );
    }

    #[test]
    fn test_aes_variant_roundtrip() {
        let cipher = BackupCipher::Aes256Cbc;
        let sealed = cipher.seal(b"water bill march", &pass("pw"));
        assert_ne!(sealed, b"water bill march");
        assert_eq!(cipher.open(&sealed, &pass("pw")).unwrap(), b"water bill march");
    }

    #[test]
    fn test_passthrough_is_identity() {
        let cipher = BackupCipher::Passthrough;
        let input = b"plain backup bytes";

        let sealed = cipher.seal(input, &pass("ignored"));
        assert_eq!(sealed, input, "passthrough seal must not alter the stream");

        let opened = cipher.open(&sealed, &pass("also ignored")).unwrap();
        assert_eq!(opened, input);
    }

    #[test]
    fn test_is_encrypting() {
        assert!(BackupCipher::Aes256Cbc.is_encrypting());
        assert!(!BackupCipher::Passthrough.is_encrypting());
    }
}
