//! Key derivation using Argon2id.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Minimum master passphrase length.
pub const MIN_PASSPHRASE_LENGTH: usize = 12;

/// Argon2id parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory in KiB (default: 65536 = 64 MiB).
    pub memory_kib: u32,
    /// Time iterations (default: 3).
    pub iterations: u32,
    /// Parallelism degree (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536, // 64 MiB
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// Low-memory parameters for small containers and test runs.
    pub fn low_memory() -> Self {
        Self {
            memory_kib: 8192, // 8 MiB
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Key wrapper with automatic zeroization on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; 32],
}

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { key: bytes }
    }

    /// Decode a base64-encoded 32-byte key.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let mut decoded = base64::engine::general_purpose::STANDARD
            .decode(&cleaned)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        if decoded.len() != 32 {
            let len = decoded.len();
            decoded.zeroize();
            return Err(CryptoError::InvalidKey(format!(
                "Expected 32 bytes, got {}",
                len
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self { key })
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Stretch a free-form salt string to the 32 bytes Argon2 is given.
pub fn salt_from_str(salt: &str) -> [u8; 32] {
    Sha256::digest(salt.as_bytes()).into()
}

/// Derive a 256-bit key from passphrase using Argon2id.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; 32],
    params: &KdfParams,
) -> CryptoResult<DerivedKey> {
    if passphrase.len() < MIN_PASSPHRASE_LENGTH {
        return Err(CryptoError::PassphraseTooShort(MIN_PASSPHRASE_LENGTH));
    }

    let argon2_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(32),
    )
    .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; 32];
    argon2
        .hash_password_into(passphrase, salt, &mut key)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    Ok(DerivedKey { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSPHRASE: &[u8] = b"autobot-master-passphrase";

    #[test]
    fn test_kdf_params_default() {
        let params = KdfParams::default();
        assert_eq!(params.memory_kib, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 4);
    }

    #[test]
    fn test_derive_key_deterministic() {
        let salt = salt_from_str("autobot");
        let params = KdfParams::low_memory();

        let key1 = derive_key(PASSPHRASE, &salt, &params).unwrap();
        let key2 = derive_key(PASSPHRASE, &salt, &params).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_salts() {
        let params = KdfParams::low_memory();
        let key1 = derive_key(PASSPHRASE, &salt_from_str("a"), &params).unwrap();
        let key2 = derive_key(PASSPHRASE, &salt_from_str("b"), &params).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_passphrase_too_short() {
        let result = derive_key(b"short", &[0u8; 32], &KdfParams::low_memory());
        assert!(matches!(result, Err(CryptoError::PassphraseTooShort(12))));
    }

    #[test]
    fn test_salt_from_str_stable() {
        assert_eq!(salt_from_str("x"), salt_from_str("x"));
        assert_ne!(salt_from_str("x"), salt_from_str("y"));
    }

    #[test]
    fn test_from_base64() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([7u8; 32]);
        let key = DerivedKey::from_base64(&encoded).unwrap();
        assert_eq!(key.as_bytes(), &[7u8; 32]);

        let short = base64::engine::general_purpose::STANDARD.encode([7u8; 16]);
        assert!(matches!(
            DerivedKey::from_base64(&short),
            Err(CryptoError::InvalidKey(_))
        ));
        assert!(matches!(
            DerivedKey::from_base64("not base64!"),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_derived_key_debug_redacted() {
        let key = DerivedKey::from_bytes([0u8; 32]);
        let debug_str = format!("{:?}", key);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains('0'));
    }

    #[test]
    fn test_kdf_params_serialization() {
        let params = KdfParams::low_memory();
        let json = serde_json::to_string(&params).unwrap();
        let parsed: KdfParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, parsed);
    }
}
