use thiserror::Error;

/// Errors surfaced by the backup codec.
///
/// Both cipher-layer kinds are unrecoverable at this layer and propagate to
/// the caller unchanged; the codec never retries.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Container header does not match the expected magic marker, or the
    /// stream ends before salt and IV are complete. Corrupted file, wrong
    /// format, or wrong tool version.
    #[error("invalid header: {0}")]
    Format(String),

    /// PKCS#7 padding validation failed on open. Unauthenticated CBC cannot
    /// distinguish a wrong passphrase from corrupted or truncated ciphertext,
    /// so all three conflate here.
    #[error("decryption failed: wrong passphrase or corrupted container")]
    Crypto,

    /// Backup payload envelope failed validation.
    #[error("invalid envelope: {0}")]
    Envelope(String),
}
