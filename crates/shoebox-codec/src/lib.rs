//! shoebox-codec: Encrypted backup containers for the shoebox archive
//!
//! Container format (wire-compatible with `openssl enc` salted output):
//! ```text
//! [8 bytes: ASCII "Salted__"][8 bytes: salt][16 bytes: IV][N bytes: AES-256-CBC ciphertext, PKCS#7]
//! key = PBKDF2-HMAC-SHA256(passphrase, salt, 100_000 iterations, 32 bytes)
//! ```
//!
//! The format carries no authentication tag; PKCS#7 padding validity on open
//! is the only integrity signal, so a wrong passphrase and a corrupted
//! container surface as the same [`CodecError::Crypto`]. Deployments that
//! disable encryption select the passthrough variant of [`BackupCipher`],
//! which leaves backup bytes unchanged.

pub mod container;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod provider;

pub use container::{open, read_header, seal, ContainerHeader};
pub use envelope::{BackupPayload, EncryptionInfo};
pub use error::CodecError;
pub use kdf::{derive_key, BackupKey};
pub use provider::BackupCipher;

/// Size of the derived AES-256 key in bytes
pub const KEY_SIZE: usize = 32;

/// Size of the per-container random salt in bytes
pub const SALT_SIZE: usize = 8;

/// Size of the CBC initialization vector (one AES block)
pub const IV_SIZE: usize = 16;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// ASCII marker opening every sealed container
pub const MAGIC: [u8; 8] = *b"Salted__";

/// Total header length: magic + salt + IV
pub const HEADER_SIZE: usize = MAGIC.len() + SALT_SIZE + IV_SIZE;
