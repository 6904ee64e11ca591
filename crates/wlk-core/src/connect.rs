//! Connect handshake: outbound request construction and inbound callback
//! handling.
//!
//! Control leaves the dapp once the request URL is opened and may not come
//! back for a long time; the OS can suspend or kill the process while the
//! wallet app is foregrounded. The handler therefore reconstructs its
//! effective state from durable storage on each entry (the stored secret
//! defines whether an attempt is pending). Only duplicate delivery within
//! one process lifetime is tracked in memory.

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use wlk_crypto::{
    derive_shared_secret,
    sealed::{open_json, SealedMessage},
};

use crate::{
    config::LinkConfig,
    deeplink::{self, params},
    errors::LinkError,
    keys::KeypairStore,
    messages::ConnectApproval,
    session::{Session, SessionStore},
    store::KeyValueStore,
};

/// Build the outbound connect deep link.
///
/// Generates a fresh keypair, superseding any stored secret, and assembles
/// the wallet's connect entry point with the dapp's encryption public key,
/// target cluster, app URL, and redirect URL. No network I/O.
pub async fn build_connect_url<S: KeyValueStore>(
    config: &LinkConfig,
    keys: &KeypairStore<S>,
) -> Result<Url, LinkError> {
    let keypair = keys.generate().await?;

    let mut url = deeplink::wallet_endpoint(&config.wallet.base_url, deeplink::CONNECT_PATH)?;
    url.query_pairs_mut()
        .append_pair(
            params::DAPP_ENCRYPTION_PUBLIC_KEY,
            &bs58::encode(keypair.public()).into_string(),
        )
        .append_pair(params::CLUSTER, &config.wallet.cluster)
        .append_pair(params::APP_URL, &config.app.url)
        .append_pair(params::REDIRECT_LINK, &config.app.redirect_url);

    tracing::debug!(%url, "connect request built");
    Ok(url)
}

/// State of the connect response handler.
#[derive(Clone, Debug)]
pub enum ConnectState {
    /// No callback processed yet.
    Idle,
    /// Callback parameters received, not yet validated.
    AwaitingParams,
    /// Parameters validated; deriving the shared secret and decrypting.
    Decrypting,
    /// Handshake complete; the session has been persisted.
    Established { session: Session },
    /// Handshake failed. Terminal for this round trip.
    Failed { reason: String },
}

/// Outcome of feeding a callback to the handler.
#[derive(Clone, Debug)]
pub enum CallbackOutcome {
    /// Session established and persisted.
    Established(Session),
    /// Duplicate delivery after the round trip already resolved; no effect.
    Ignored,
}

/// Handles the inbound connect callback: loads the pending secret, derives
/// the shared secret, decrypts the wallet's reply, and materializes the
/// session.
pub struct ConnectHandler<S: KeyValueStore> {
    state: ConnectState,
    keys: KeypairStore<S>,
    sessions: SessionStore<S>,
}

impl<S: KeyValueStore> ConnectHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            state: ConnectState::Idle,
            keys: KeypairStore::new(store.clone()),
            sessions: SessionStore::new(store),
        }
    }

    /// Get the current state.
    pub fn state(&self) -> &ConnectState {
        &self.state
    }

    /// Reset the state machine for a fresh connect attempt.
    pub fn reset(&mut self) {
        self.state = ConnectState::Idle;
    }

    /// Process the query parameters of an inbound connect callback.
    ///
    /// Writing the session is the one durable side effect of the whole
    /// handshake. Any failure is terminal for this round trip: the reply is
    /// never retried with a different secret, because the only valid secret
    /// is the one generated for this attempt.
    pub async fn handle_callback(
        &mut self,
        query: &HashMap<String, String>,
    ) -> Result<CallbackOutcome, LinkError> {
        match &self.state {
            ConnectState::Idle | ConnectState::AwaitingParams => {}
            ConnectState::Decrypting => {
                return Err(LinkError::InvalidState(
                    "callback already being processed".into(),
                ));
            }
            ConnectState::Established { .. } | ConnectState::Failed { .. } => {
                // Deep links can be delivered more than once; a resolved
                // round trip absorbs the duplicates.
                tracing::debug!("duplicate connect callback ignored");
                return Ok(CallbackOutcome::Ignored);
            }
        }
        self.state = ConnectState::AwaitingParams;

        let wallet_pub_b58 = match required(query, params::WALLET_ENCRYPTION_PUBLIC_KEY) {
            Ok(v) => v,
            Err(e) => return Err(self.fail(e)),
        };
        let data_b58 = match required(query, params::DATA) {
            Ok(v) => v,
            Err(e) => return Err(self.fail(e)),
        };
        let nonce_b58 = match required(query, params::NONCE) {
            Ok(v) => v,
            Err(e) => return Err(self.fail(e)),
        };

        let secret = match self.keys.current_secret().await {
            Ok(Some(secret)) => secret,
            Ok(None) => return Err(self.fail(LinkError::NoPendingConnection)),
            Err(e) => return Err(self.fail(e)),
        };

        self.state = ConnectState::Decrypting;

        match self
            .decrypt_and_store(&secret, wallet_pub_b58, data_b58, nonce_b58)
            .await
        {
            Ok(session) => {
                self.state = ConnectState::Established {
                    session: session.clone(),
                };
                tracing::info!(wallet = %session.wallet_address, "wallet session established");
                Ok(CallbackOutcome::Established(session))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn decrypt_and_store(
        &self,
        secret: &[u8; 32],
        wallet_pub_b58: &str,
        data_b58: &str,
        nonce_b58: &str,
    ) -> Result<Session, LinkError> {
        let wallet_public = deeplink::decode_public_key(wallet_pub_b58)?;
        let shared = derive_shared_secret(secret, &wallet_public)?;

        let nonce = deeplink::decode_nonce(nonce_b58)?;
        let ciphertext = bs58::decode(data_b58)
            .into_vec()
            .map_err(|e| LinkError::MalformedPayload(format!("data parameter: {e}")))?;
        let sealed = SealedMessage { nonce, ciphertext };

        let approval: ConnectApproval = open_json(&sealed, &shared)?;
        if approval.public_key.is_empty() || approval.session.is_empty() {
            return Err(LinkError::MalformedPayload(
                "approval missing wallet address or session token".into(),
            ));
        }

        let session = Session {
            wallet_address: approval.public_key,
            session_token: approval.session,
            wallet_public_key: wallet_public,
            connected_at: unix_now(),
        };
        self.sessions.save(&session).await?;
        Ok(session)
    }

    fn fail(&mut self, err: LinkError) -> LinkError {
        tracing::warn!(error = %err, "connect handshake failed");
        self.state = ConnectState::Failed {
            reason: err.to_string(),
        };
        err
    }
}

fn required<'a>(
    query: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str, LinkError> {
    query
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or(LinkError::MissingParameters(name))
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[tokio::test]
    async fn test_connect_url_carries_all_parameters() {
        let config = LinkConfig::default();
        let store = InMemoryStore::new_shared();
        let keys = KeypairStore::new(store);

        let url = build_connect_url(&config, &keys).await.unwrap();
        let query = deeplink::callback_params(&url);

        assert!(url.as_str().starts_with("https://backpack.app/ul/v1/connect?"));
        assert!(query.contains_key(params::DAPP_ENCRYPTION_PUBLIC_KEY));
        assert_eq!(query.get(params::CLUSTER).map(String::as_str), Some("mainnet-beta"));
        assert_eq!(
            query.get(params::APP_URL),
            Some(&config.app.url)
        );
        assert_eq!(
            query.get(params::REDIRECT_LINK),
            Some(&config.app.redirect_url)
        );
    }

    #[tokio::test]
    async fn test_connect_url_public_key_matches_stored_secret() {
        let config = LinkConfig::default();
        let store = InMemoryStore::new_shared();
        let keys = KeypairStore::new(store);

        let url = build_connect_url(&config, &keys).await.unwrap();
        let query = deeplink::callback_params(&url);

        let advertised = deeplink::decode_public_key(
            query.get(params::DAPP_ENCRYPTION_PUBLIC_KEY).unwrap(),
        )
        .unwrap();
        let secret = keys.current_secret().await.unwrap().unwrap();
        let derived = wlk_crypto::EphemeralKeypair::from_secret_bytes(secret).public();

        assert_eq!(advertised, derived);
    }

    #[tokio::test]
    async fn test_callback_without_pending_attempt() {
        let store = InMemoryStore::new_shared();
        let mut handler = ConnectHandler::new(store);

        let mut query = HashMap::new();
        query.insert(
            params::WALLET_ENCRYPTION_PUBLIC_KEY.to_string(),
            bs58::encode([1u8; 32]).into_string(),
        );
        query.insert(params::DATA.to_string(), "abc".to_string());
        query.insert(
            params::NONCE.to_string(),
            bs58::encode([2u8; 24]).into_string(),
        );

        let result = handler.handle_callback(&query).await;
        assert!(matches!(result, Err(LinkError::NoPendingConnection)));
        assert!(matches!(handler.state(), ConnectState::Failed { .. }));
    }

    #[tokio::test]
    async fn test_missing_parameter_names_the_parameter() {
        let store = InMemoryStore::new_shared();
        let mut handler = ConnectHandler::new(store);

        let query = HashMap::new();
        let result = handler.handle_callback(&query).await;

        assert!(matches!(
            result,
            Err(LinkError::MissingParameters(name)) if name == params::WALLET_ENCRYPTION_PUBLIC_KEY
        ));
    }

    #[tokio::test]
    async fn test_failed_handler_ignores_later_callbacks() {
        let store = InMemoryStore::new_shared();
        let mut handler = ConnectHandler::new(store);

        let query = HashMap::new();
        let _ = handler.handle_callback(&query).await;

        let outcome = handler.handle_callback(&query).await.unwrap();
        assert!(matches!(outcome, CallbackOutcome::Ignored));
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let store = InMemoryStore::new_shared();
        let mut handler = ConnectHandler::new(store);

        let _ = handler.handle_callback(&HashMap::new()).await;
        assert!(matches!(handler.state(), ConnectState::Failed { .. }));

        handler.reset();
        assert!(matches!(handler.state(), ConnectState::Idle));
    }
}
