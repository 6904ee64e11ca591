//! Error type shared by the wallet-link crypto primitives.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    /// The OS refused to supply cryptographically secure random bytes.
    /// There is no fallback generator.
    #[error("secure randomness unavailable")]
    RandomnessUnavailable,

    #[error("invalid public key encoding")]
    InvalidPublicKey,

    #[error("encryption failed")]
    EncryptFailed,

    /// Authentication tag did not verify: tampered ciphertext, wrong
    /// secret, or wrong nonce.
    #[error("decryption failed")]
    DecryptionFailed,

    /// Plaintext decrypted but did not match the expected schema.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}
