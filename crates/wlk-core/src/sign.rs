//! Sign-and-send request construction.
//!
//! The signing flow reuses the keypair that produced the session; the
//! public key in the URL is re-derived from the stored secret, never
//! regenerated.

use url::Url;

use wlk_crypto::{derive_shared_secret, sealed::seal_json, EphemeralKeypair};

use crate::{
    config::LinkConfig,
    deeplink::{self, params},
    errors::LinkError,
    keys::KeypairStore,
    messages::SignRequest,
    session::SessionStore,
    store::KeyValueStore,
};

/// Build an encrypted sign-and-send deep link for an opaque unsigned
/// transaction blob.
///
/// Fails with `NoActiveSession` if no session is persisted, and with
/// `NoSecretKey` if the secret that originated the session is gone from
/// storage.
pub async fn build_sign_url<S: KeyValueStore>(
    config: &LinkConfig,
    keys: &KeypairStore<S>,
    sessions: &SessionStore<S>,
    unsigned_tx: &[u8],
    redirect_url: &Url,
) -> Result<Url, LinkError> {
    let session = sessions.load().await?.ok_or(LinkError::NoActiveSession)?;
    let secret = keys
        .current_secret()
        .await?
        .ok_or(LinkError::NoSecretKey)?;
    let keypair = EphemeralKeypair::from_secret_bytes(secret);

    let shared = derive_shared_secret(&secret, &session.wallet_public_key)?;
    let request = SignRequest {
        session: session.session_token.clone(),
        transaction: bs58::encode(unsigned_tx).into_string(),
    };
    let sealed = seal_json(&request, &shared)?;

    let mut url =
        deeplink::wallet_endpoint(&config.wallet.base_url, deeplink::SIGN_AND_SEND_PATH)?;
    url.query_pairs_mut()
        .append_pair(
            params::DAPP_ENCRYPTION_PUBLIC_KEY,
            &bs58::encode(keypair.public()).into_string(),
        )
        .append_pair(params::CLUSTER, &config.wallet.cluster)
        .append_pair(params::NONCE, &bs58::encode(sealed.nonce).into_string())
        .append_pair(params::REDIRECT_LINK, redirect_url.as_str())
        .append_pair(
            params::PAYLOAD,
            &bs58::encode(&sealed.ciphertext).into_string(),
        );

    tracing::debug!(wallet = %session.wallet_address, "sign-and-send request built");
    Ok(url)
}
