//! Error types for the wallet-link core.
//!
//! Cryptographic and parameter errors are terminal for the current flow:
//! there is no silent retry with stale keys, the caller returns to the
//! disconnected view, and a later connect attempt starts over with fresh
//! key material.

use thiserror::Error;

use crate::store::StoreError;
use wlk_crypto::CryptoError;

/// Unified error type for the connect and signing flows.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The OS refused to supply secure random bytes. Fatal; never
    /// downgraded to a non-cryptographic generator.
    #[error("secure randomness unavailable")]
    RandomnessUnavailable,

    /// The counterpart public key is not a valid curve point encoding.
    #[error("invalid wallet public key")]
    InvalidPublicKey,

    /// A required callback query parameter is absent.
    #[error("missing callback parameter: {0}")]
    MissingParameters(&'static str),

    /// Authentication failed on the sealed payload. The message is treated
    /// as untrusted; no decrypted plaintext escapes.
    #[error("payload decryption failed")]
    DecryptionFailed,

    /// Decryption or decoding succeeded but the data did not match the
    /// expected shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A connect callback arrived with no outstanding connect request.
    #[error("no pending connection attempt")]
    NoPendingConnection,

    /// A signing request was made with no established session.
    #[error("no active session")]
    NoActiveSession,

    /// The secret that produced the session is no longer in storage.
    #[error("secret key not found")]
    NoSecretKey,

    /// Invalid state transition in the connect handshake.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A wallet endpoint or redirect URL could not be formed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Store operation failed. Surfaces without corrupting whatever
    /// session is already persisted.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<CryptoError> for LinkError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::RandomnessUnavailable => LinkError::RandomnessUnavailable,
            CryptoError::InvalidPublicKey => LinkError::InvalidPublicKey,
            CryptoError::EncryptFailed => LinkError::Crypto("encryption failed".into()),
            CryptoError::DecryptionFailed => LinkError::DecryptionFailed,
            CryptoError::MalformedPayload(s) => LinkError::MalformedPayload(s),
        }
    }
}
