//! # autobot-crypto
//!
//! Encryption of third-party API keys at rest.
//!
//! Keys are sealed with AES-256-GCM under a 256-bit key that is either
//! supplied raw or derived with Argon2id from the deployment master
//! passphrase. Sealed values are self-describing `ab1:` envelopes.

pub mod cipher;
pub mod error;
pub mod kdf;
pub mod sealed;

pub use error::{CryptoError, CryptoResult};
pub use kdf::{derive_key, DerivedKey, KdfParams};
pub use sealed::{SecretBox, DEFAULT_KEY_SALT, ENVELOPE_PREFIX};
