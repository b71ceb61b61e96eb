//! Sealed string envelopes for secrets kept in the database.
//!
//! Format: `ab1:` followed by base64 of `nonce (12) || ciphertext || tag (16)`.
//! A fresh nonce is drawn for every seal, so sealing the same value twice
//! gives different envelopes.

use base64::Engine;
use tracing::debug;

use crate::cipher::{aes_gcm_decrypt, aes_gcm_encrypt, generate_nonce, NONCE_LEN, TAG_LEN};
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{derive_key, salt_from_str, DerivedKey, KdfParams};

/// Envelope prefix, versioned.
pub const ENVELOPE_PREFIX: &str = "ab1:";

/// Salt used when the deployment does not configure one.
pub const DEFAULT_KEY_SALT: &str = "autobot-user-api-keys";

/// Seals and opens strings under a single 256-bit key.
pub struct SecretBox {
    key: DerivedKey,
}

impl SecretBox {
    pub fn from_key(key: DerivedKey) -> Self {
        Self { key }
    }

    /// Derive the key from a master passphrase and salt string.
    pub fn from_passphrase(passphrase: &str, salt: &str) -> CryptoResult<Self> {
        Self::from_passphrase_with_params(passphrase, salt, &KdfParams::default())
    }

    pub fn from_passphrase_with_params(
        passphrase: &str,
        salt: &str,
        params: &KdfParams,
    ) -> CryptoResult<Self> {
        let key = derive_key(passphrase.as_bytes(), &salt_from_str(salt), params)?;
        debug!(
            subsystem = "crypto",
            component = "secret_box",
            memory_kib = params.memory_kib,
            "Derived sealing key"
        );
        Ok(Self { key })
    }

    /// Build from deployment settings.
    ///
    /// `master_key` is either `base64:` followed by a raw 32-byte key, or a
    /// passphrase run through Argon2id with `salt` (default
    /// [`DEFAULT_KEY_SALT`]).
    pub fn from_master_key(master_key: &str, salt: Option<&str>) -> CryptoResult<Self> {
        match master_key.strip_prefix("base64:") {
            Some(encoded) => Ok(Self::from_key(DerivedKey::from_base64(encoded)?)),
            None => Self::from_passphrase(master_key, salt.unwrap_or(DEFAULT_KEY_SALT)),
        }
    }

    /// Whether `value` looks like a sealed envelope.
    pub fn is_sealed(value: &str) -> bool {
        value.starts_with(ENVELOPE_PREFIX)
    }

    pub fn seal(&self, plaintext: &str) -> CryptoResult<String> {
        let nonce = generate_nonce();
        let ciphertext = aes_gcm_encrypt(self.key.as_bytes(), &nonce, plaintext.as_bytes())?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);

        Ok(format!(
            "{}{}",
            ENVELOPE_PREFIX,
            base64::engine::general_purpose::STANDARD.encode(payload)
        ))
    }

    pub fn open(&self, sealed: &str) -> CryptoResult<String> {
        let encoded = sealed
            .strip_prefix(ENVELOPE_PREFIX)
            .ok_or_else(|| CryptoError::InvalidFormat("missing envelope prefix".to_string()))?;

        let payload = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidFormat(e.to_string()))?;

        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::InvalidFormat(format!(
                "envelope too short: {} bytes",
                payload.len()
            )));
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(nonce);

        let plaintext = aes_gcm_decrypt(self.key.as_bytes(), &nonce_bytes, ciphertext)?;
        String::from_utf8(plaintext).map_err(|e| CryptoError::Decryption(e.to_string()))
    }
}

impl std::fmt::Debug for SecretBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBox")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
