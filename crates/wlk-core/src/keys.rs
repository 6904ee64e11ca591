//! Ephemeral keypair persistence.
//!
//! One durable slot holds the secret scalar for the in-flight or most
//! recent connect attempt; no history is kept. The secret must still be in
//! the slot when the wallet's response arrives, because the wallet's public
//! key alone is insufficient to derive the shared secret.
//!
//! Hazard: calling `generate` while a request is outstanding overwrites the
//! slot and invalidates that request. A callback for the superseded attempt
//! then derives a wrong shared secret and fails closed during decryption.

use std::sync::Arc;

use wlk_crypto::EphemeralKeypair;

use crate::{
    errors::LinkError,
    store::{KeyValueStore, StoreError},
};

/// Storage key for the dapp's secret scalar (base-58 at rest).
pub const SECRET_KEY_SLOT: &str = "dapp_secret_key";

/// Single-slot store for the dapp-side ephemeral keypair.
pub struct KeypairStore<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> KeypairStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Draw a fresh keypair and persist its secret, superseding any
    /// previous one.
    pub async fn generate(&self) -> Result<EphemeralKeypair, LinkError> {
        let keypair = EphemeralKeypair::generate()?;
        let encoded = bs58::encode(keypair.secret_bytes()).into_string();
        self.store.put(SECRET_KEY_SLOT, &encoded).await?;

        tracing::debug!(
            public_key = %hex::encode(&keypair.public()[..8]),
            "generated connect keypair"
        );
        Ok(keypair)
    }

    /// Secret scalar of the in-flight or most recent connect attempt.
    pub async fn current_secret(&self) -> Result<Option<[u8; 32]>, LinkError> {
        let Some(encoded) = self.store.get(SECRET_KEY_SLOT).await? else {
            return Ok(None);
        };

        let bytes = bs58::decode(&encoded)
            .into_vec()
            .map_err(|e| StoreError::Serialization(format!("stored secret: {e}")))?;
        let secret: [u8; 32] = bytes
            .try_into()
            .map_err(|_| StoreError::Serialization("stored secret has wrong length".into()))?;
        Ok(Some(secret))
    }

    /// Remove the stored secret.
    pub async fn clear(&self) -> Result<(), LinkError> {
        self.store.delete(SECRET_KEY_SLOT).await?;
        Ok(())
    }
}
