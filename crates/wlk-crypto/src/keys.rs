//! Ephemeral X25519 keypairs for the connect handshake.
//!
//! The dapp draws a fresh keypair before every connect attempt; each new
//! keypair supersedes the previous one. Secret material is zeroized on drop
//! by the underlying `StaticSecret`.

use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// X25519 keypair owned by the dapp for one connection lifetime.
pub struct EphemeralKeypair {
    secret: StaticSecret,
}

impl EphemeralKeypair {
    /// Draw a fresh keypair from the OS random source.
    ///
    /// Fails if the OS cannot supply secure random bytes; there is no
    /// non-cryptographic fallback.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut seed = Zeroizing::new([0u8; 32]);
        getrandom::getrandom(&mut *seed).map_err(|_| CryptoError::RandomnessUnavailable)?;
        Ok(Self {
            secret: StaticSecret::from(*seed),
        })
    }

    /// Rebuild the keypair from a persisted secret scalar.
    pub fn from_secret_bytes(secret: [u8; 32]) -> Self {
        Self {
            secret: StaticSecret::from(secret),
        }
    }

    /// Public key derived from the secret scalar.
    pub fn public(&self) -> [u8; 32] {
        PublicKey::from(&self.secret).to_bytes()
    }

    /// Raw secret scalar, for persistence across the app switch.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }
}
