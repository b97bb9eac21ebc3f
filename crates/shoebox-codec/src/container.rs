//! Salted AES-256-CBC container framing: seal and open
//!
//! A sealed container is `magic || salt || iv || ciphertext`, readable from
//! offset zero. Salt and IV are fresh CSPRNG output on every seal; reusing a
//! `(key, iv)` pair would break confidentiality, so they are never cached or
//! passed in by callers.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use secrecy::SecretString;
use tracing::debug;

use crate::error::CodecError;
use crate::kdf::derive_key;
use crate::{BLOCK_SIZE, HEADER_SIZE, IV_SIZE, MAGIC, SALT_SIZE};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Seal plaintext into a salted AES-256-CBC container.
///
/// Each call draws a fresh salt and IV, so two seals of identical input
/// produce different bytes that both open to the same plaintext.
pub fn seal(plaintext: &[u8], passphrase: &SecretString) -> Vec<u8> {
    let mut salt = [0u8; SALT_SIZE];
    let mut iv = [0u8; IV_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    rand::thread_rng().fill_bytes(&mut iv);

    let key = derive_key(passphrase, &salt);

    let ciphertext = Aes256CbcEnc::new(key.as_bytes().into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut container = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    container.extend_from_slice(&MAGIC);
    container.extend_from_slice(&salt);
    container.extend_from_slice(&iv);
    container.extend_from_slice(&ciphertext);

    // Only non-secret metadata here; key, salt, and IV bytes stay out of logs.
    debug!(container_len = container.len(), "sealed backup container");

    container
}

/// Open a sealed container, recovering the original plaintext.
///
/// Fails with [`CodecError::Format`] when the header is not a valid container
/// header, and with [`CodecError::Crypto`] when padding validation rejects
/// the decryption (wrong passphrase, corrupted or truncated ciphertext; the
/// format cannot tell these apart).
pub fn open(container: &[u8], passphrase: &SecretString) -> Result<Vec<u8>, CodecError> {
    if container.len() < MAGIC.len() || container[..MAGIC.len()] != MAGIC {
        return Err(CodecError::Format(
            "missing Salted__ marker".into(),
        ));
    }
    if container.len() < HEADER_SIZE {
        return Err(CodecError::Format(format!(
            "truncated header: {} bytes (expected at least {HEADER_SIZE})",
            container.len()
        )));
    }

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&container[MAGIC.len()..MAGIC.len() + SALT_SIZE]);
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&container[MAGIC.len() + SALT_SIZE..HEADER_SIZE]);

    let ciphertext = &container[HEADER_SIZE..];
    // PKCS#7 always emits at least one full block; anything shorter or
    // misaligned cannot be a valid ciphertext.
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CodecError::Crypto);
    }

    let key = derive_key(passphrase, &salt);

    let plaintext = Aes256CbcDec::new(key.as_bytes().into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CodecError::Crypto)?;

    debug!(plaintext_len = plaintext.len(), "opened backup container");

    Ok(plaintext)
}

/// Parsed view of a container header: the public, unencrypted fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub salt: [u8; SALT_SIZE],
    pub iv: [u8; IV_SIZE],
    pub ciphertext_len: usize,
}

/// Parse a container's header without deriving a key or decrypting.
///
/// Salt and IV are stored in the clear by the format; exposing them reveals
/// nothing about the passphrase or plaintext.
pub fn read_header(container: &[u8]) -> Result<ContainerHeader, CodecError> {
    if container.len() < MAGIC.len() || container[..MAGIC.len()] != MAGIC {
        return Err(CodecError::Format("missing Salted__ marker".into()));
    }
    if container.len() < HEADER_SIZE {
        return Err(CodecError::Format(format!(
            "truncated header: {} bytes (expected at least {HEADER_SIZE})",
            container.len()
        )));
    }

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&container[MAGIC.len()..MAGIC.len() + SALT_SIZE]);
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&container[MAGIC.len() + SALT_SIZE..HEADER_SIZE]);

    Ok(ContainerHeader {
        salt,
        iv,
        ciphertext_len: container.len() - HEADER_SIZE,
    })
}
