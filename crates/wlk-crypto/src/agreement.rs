//! X25519 key agreement.
//!
//! Both parties combine their own secret scalar with the counterpart's
//! public key and arrive at the same 32 bytes; that symmetry is the
//! soundness condition the sealed codec depends on. The scalar
//! multiplication is constant-time in the secret input.

use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Shared secret produced by X25519 key agreement.
///
/// Never persisted; recomputed on demand from the persisted local secret
/// and the counterpart's public key. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Derive the shared secret from a local secret scalar and the remote
/// party's public key bytes.
///
/// Pure function, no side effects. Fails with `InvalidPublicKey` if
/// `remote_public` is not a 32-byte curve point encoding.
pub fn derive_shared_secret(
    local_secret: &[u8; 32],
    remote_public: &[u8],
) -> Result<SharedSecret, CryptoError> {
    let remote: [u8; 32] = remote_public
        .try_into()
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let secret = StaticSecret::from(*local_secret);
    let shared = secret.diffie_hellman(&PublicKey::from(remote));
    Ok(SharedSecret(shared.to_bytes()))
}
