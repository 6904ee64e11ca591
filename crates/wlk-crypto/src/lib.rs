//! Cryptographic primitives for the wallet-link handshake.
//!
//! Everything that crosses the deep-link boundary is protected by the
//! primitives in this crate: ephemeral X25519 keypairs, ECDH key agreement,
//! and an authenticated payload codec (24-byte random nonce +
//! XSalsa20-Poly1305).

#![forbid(unsafe_code)]

pub mod agreement;
pub mod error;
pub mod keys;
pub mod sealed;

pub use agreement::{derive_shared_secret, SharedSecret};
pub use error::CryptoError;
pub use keys::EphemeralKeypair;
pub use sealed::SealedMessage;

#[cfg(test)]
mod proptests;
