//! Key derivation: PBKDF2-HMAC-SHA256 passphrase → AES-256 key

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{KEY_SIZE, SALT_SIZE};

/// PBKDF2 iteration count. Fixed by the container format: containers sealed
/// with a different count cannot be opened, so this is a format constant, not
/// a tunable.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A 256-bit backup encryption key derived from a passphrase via PBKDF2.
///
/// Zeroized on drop to prevent secrets lingering in memory.
#[derive(Clone)]
pub struct BackupKey {
    bytes: [u8; KEY_SIZE],
}

impl BackupKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for BackupKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for BackupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 256-bit key from a passphrase and per-container salt.
///
/// Deterministic for identical `(passphrase, salt)`. Empty passphrases are
/// accepted and simply produce a derived key; passphrase strength policy
/// belongs to the caller.
pub fn derive_key(passphrase: &SecretString, salt: &[u8; SALT_SIZE]) -> BackupKey {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        passphrase.expose_secret().as_bytes(),
        salt,
        PBKDF2_ITERATIONS,
        &mut key,
    );
    BackupKey::from_bytes(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kdf_deterministic() {
        let passphrase = SecretString::from("test-passphrase-123");
        let salt = [1u8; SALT_SIZE];

        let key1 = derive_key(&passphrase, &salt);
        let key2 = derive_key(&passphrase, &salt);

        assert_eq!(key1.as_bytes(), key2.as_bytes(), "KDF must be deterministic");
    }

    #[test]
    fn test_kdf_different_passphrases() {
        let salt = [1u8; SALT_SIZE];

        let key1 = derive_key(&SecretString::from("passphrase-a"), &salt);
        let key2 = derive_key(&SecretString::from("passphrase-b"), &salt);

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different passphrases must produce different keys"
        );
    }

    #[test]
    fn test_kdf_different_salts() {
        let passphrase = SecretString::from("same-passphrase");

        let key1 = derive_key(&passphrase, &[1u8; SALT_SIZE]);
        let key2 = derive_key(&passphrase, &[2u8; SALT_SIZE]);

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different salts must produce different keys"
        );
    }

    #[test]
    fn test_kdf_accepts_empty_passphrase() {
        let key = derive_key(&SecretString::from(""), &[0u8; SALT_SIZE]);
        assert_eq!(key.as_bytes().len(), KEY_SIZE);
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let key = BackupKey::from_bytes([7u8; KEY_SIZE]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains('7'));
    }
}
