//! Session record and its persistence.
//!
//! The session is created once by the connect handler and is exclusively
//! owned by the store; readers take a fresh copy via `load` rather than
//! holding onto one across the app switch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    errors::LinkError,
    keys::KeypairStore,
    store::{KeyValueStore, StoreError},
};

/// Storage key for the serialized session record.
pub const SESSION_SLOT: &str = "wallet_session";
/// Storage key for the wallet's encryption public key (base-58 at rest).
pub const WALLET_PUBLIC_KEY_SLOT: &str = "wallet_encryption_public_key";

/// Established connection to a wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Wallet account address reported in the connect approval.
    pub wallet_address: String,
    /// Opaque wallet-issued token, presented on later signing requests to
    /// prove continuity of the connection.
    pub session_token: String,
    /// Wallet's X25519 encryption public key.
    pub wallet_public_key: [u8; 32],
    /// Unix seconds at which the handshake completed.
    pub connected_at: u64,
}

/// Serializable session record for storage.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    /// Version for future compatibility
    version: u32,
    wallet_address: String,
    session_token: String,
    /// Wallet encryption public key (base-58)
    wallet_public_key: String,
    connected_at: u64,
}

impl StoredSession {
    const CURRENT_VERSION: u32 = 1;

    fn from_session(session: &Session) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            wallet_address: session.wallet_address.clone(),
            session_token: session.session_token.clone(),
            wallet_public_key: bs58::encode(session.wallet_public_key).into_string(),
            connected_at: session.connected_at,
        }
    }

    fn into_session(self) -> Result<Session, LinkError> {
        let bytes = bs58::decode(&self.wallet_public_key)
            .into_vec()
            .map_err(|e| StoreError::Serialization(format!("stored wallet key: {e}")))?;
        let wallet_public_key: [u8; 32] = bytes.try_into().map_err(|_| {
            StoreError::Serialization("stored wallet key has wrong length".into())
        })?;

        Ok(Session {
            wallet_address: self.wallet_address,
            session_token: self.session_token,
            wallet_public_key,
            connected_at: self.connected_at,
        })
    }
}

/// Durable single-slot persistence for the session record.
pub struct SessionStore<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Persist the session record and the wallet's encryption public key.
    pub async fn save(&self, session: &Session) -> Result<(), LinkError> {
        let record = StoredSession::from_session(session);
        let json = serde_json::to_string(&record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.store.put(SESSION_SLOT, &json).await?;
        self.store
            .put(
                WALLET_PUBLIC_KEY_SLOT,
                &bs58::encode(session.wallet_public_key).into_string(),
            )
            .await?;

        tracing::info!(wallet = %session.wallet_address, "session saved");
        Ok(())
    }

    /// Load the persisted session, if any.
    pub async fn load(&self) -> Result<Option<Session>, LinkError> {
        let Some(json) = self.store.get(SESSION_SLOT).await? else {
            return Ok(None);
        };

        let record: StoredSession = serde_json::from_str(&json)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Some(record.into_session()?))
    }

    /// Remove the session record and the wallet public key.
    pub async fn clear(&self) -> Result<(), LinkError> {
        self.store.delete(SESSION_SLOT).await?;
        self.store.delete(WALLET_PUBLIC_KEY_SLOT).await?;
        Ok(())
    }
}

/// Tear down the connection: the session record, the wallet encryption
/// public key, and the dapp's ephemeral secret are cleared together.
pub async fn disconnect<S: KeyValueStore>(
    keys: &KeypairStore<S>,
    sessions: &SessionStore<S>,
) -> Result<(), LinkError> {
    sessions.clear().await?;
    keys.clear().await?;
    tracing::info!("wallet disconnected, stored link state cleared");
    Ok(())
}
