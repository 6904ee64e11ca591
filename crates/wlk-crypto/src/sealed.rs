//! Sealed payload codec: 24-byte random nonce + XSalsa20-Poly1305.
//!
//! The transport is a URL opened by an external application and is fully
//! untrusted, so the authentication tag checked during decryption is the
//! sole integrity check protecting the channel.

use crypto_secretbox::{
    aead::{Aead, KeyInit},
    Key, Nonce, XSalsa20Poly1305,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{agreement::SharedSecret, error::CryptoError};

/// Nonce length of the XSalsa20-Poly1305 construction.
pub const NONCE_LEN: usize = 24;

/// One authenticated-encrypted message as it travels inside a URL.
///
/// Exists only on the wire and transiently in memory.
#[derive(Clone, Debug)]
pub struct SealedMessage {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under `secret` with a fresh random nonce.
///
/// A nonce must never be reused with the same secret; each call draws a new
/// one from the OS. Fails with `RandomnessUnavailable` if that draw fails.
pub fn seal(plaintext: &[u8], secret: &SharedSecret) -> Result<SealedMessage, CryptoError> {
    let mut nonce = [0u8; NONCE_LEN];
    getrandom::getrandom(&mut nonce).map_err(|_| CryptoError::RandomnessUnavailable)?;

    let cipher = XSalsa20Poly1305::new(Key::from_slice(secret.as_bytes()));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::EncryptFailed)?;

    Ok(SealedMessage { nonce, ciphertext })
}

/// Authenticated-decrypt a sealed message.
///
/// Fails with `DecryptionFailed` if the tag does not verify; no partial
/// plaintext is ever returned.
pub fn open(message: &SealedMessage, secret: &SharedSecret) -> Result<Vec<u8>, CryptoError> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(secret.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(&message.nonce), message.ciphertext.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed)
}

/// Serialize `payload` to JSON and seal it.
pub fn seal_json<T: Serialize>(
    payload: &T,
    secret: &SharedSecret,
) -> Result<SealedMessage, CryptoError> {
    let bytes =
        serde_json::to_vec(payload).map_err(|e| CryptoError::MalformedPayload(e.to_string()))?;
    seal(&bytes, secret)
}

/// Open a sealed message and deserialize the plaintext.
///
/// Fails with `MalformedPayload` if deserialization fails after successful
/// decryption.
pub fn open_json<T: DeserializeOwned>(
    message: &SealedMessage,
    secret: &SharedSecret,
) -> Result<T, CryptoError> {
    let bytes = open(message, secret)?;
    serde_json::from_slice(&bytes).map_err(|e| CryptoError::MalformedPayload(e.to_string()))
}
