//! Error types for cryptographic operations.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key derivation failed.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed - wrong key or corrupted data.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Raw key has the wrong size or encoding.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Passphrase too short.
    #[error("Passphrase too short (minimum {0} characters required)")]
    PassphraseTooShort(usize),

    /// Value is not a sealed envelope.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

impl From<CryptoError> for autobot_core::Error {
    fn from(e: CryptoError) -> Self {
        autobot_core::Error::Crypto(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passphrase_too_short_display() {
        let err = CryptoError::PassphraseTooShort(12);
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_into_core_error() {
        let err: autobot_core::Error = CryptoError::InvalidFormat("missing prefix".into()).into();
        assert!(matches!(err, autobot_core::Error::Crypto(ref msg) if msg.contains("missing prefix")));
    }
}
