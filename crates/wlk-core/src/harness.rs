//! In-process wallet counterparty for tests and demos.
//!
//! `SimulatedWallet` plays the wallet application's half of the protocol:
//! it reads the connect request URL, generates its own encryption keypair,
//! seals the approval payload under the ECDH secret, and produces the
//! callback parameter map the dapp-side handler consumes.

use std::collections::HashMap;

use url::Url;

use wlk_crypto::{
    derive_shared_secret,
    sealed::{open_json, seal_json, SealedMessage},
    EphemeralKeypair,
};

use crate::{
    deeplink::{self, params},
    errors::LinkError,
    messages::{ConnectApproval, SignRequest},
};

/// Wallet-side counterparty holding its own encryption keypair.
pub struct SimulatedWallet {
    keypair: EphemeralKeypair,
    address: String,
    session_token: String,
}

impl SimulatedWallet {
    pub fn new(address: &str, session_token: &str) -> Result<Self, LinkError> {
        Ok(Self {
            keypair: EphemeralKeypair::generate()?,
            address: address.to_string(),
            session_token: session_token.to_string(),
        })
    }

    /// The wallet's X25519 encryption public key.
    pub fn public_key(&self) -> [u8; 32] {
        self.keypair.public()
    }

    /// Approve a connect request URL, producing the callback parameters the
    /// wallet would append to the dapp's redirect link.
    pub fn approve_connect(
        &self,
        connect_url: &Url,
    ) -> Result<HashMap<String, String>, LinkError> {
        let query = deeplink::callback_params(connect_url);
        let dapp_pub_b58 = query
            .get(params::DAPP_ENCRYPTION_PUBLIC_KEY)
            .ok_or(LinkError::MissingParameters(
                params::DAPP_ENCRYPTION_PUBLIC_KEY,
            ))?;
        let dapp_public = deeplink::decode_public_key(dapp_pub_b58)?;

        let shared = derive_shared_secret(&self.keypair.secret_bytes(), &dapp_public)?;
        let approval = ConnectApproval {
            public_key: self.address.clone(),
            session: self.session_token.clone(),
        };
        let sealed = seal_json(&approval, &shared)?;

        let mut callback = HashMap::new();
        callback.insert(
            params::WALLET_ENCRYPTION_PUBLIC_KEY.to_string(),
            bs58::encode(self.keypair.public()).into_string(),
        );
        callback.insert(
            params::DATA.to_string(),
            bs58::encode(&sealed.ciphertext).into_string(),
        );
        callback.insert(
            params::NONCE.to_string(),
            bs58::encode(sealed.nonce).into_string(),
        );
        Ok(callback)
    }

    /// Decrypt a sign-and-send request URL as the wallet would.
    pub fn open_sign_request(&self, sign_url: &Url) -> Result<SignRequest, LinkError> {
        let query = deeplink::callback_params(sign_url);

        let dapp_pub_b58 = query
            .get(params::DAPP_ENCRYPTION_PUBLIC_KEY)
            .ok_or(LinkError::MissingParameters(
                params::DAPP_ENCRYPTION_PUBLIC_KEY,
            ))?;
        let nonce_b58 = query
            .get(params::NONCE)
            .ok_or(LinkError::MissingParameters(params::NONCE))?;
        let payload_b58 = query
            .get(params::PAYLOAD)
            .ok_or(LinkError::MissingParameters(params::PAYLOAD))?;

        let dapp_public = deeplink::decode_public_key(dapp_pub_b58)?;
        let shared = derive_shared_secret(&self.keypair.secret_bytes(), &dapp_public)?;

        let sealed = SealedMessage {
            nonce: deeplink::decode_nonce(nonce_b58)?,
            ciphertext: bs58::decode(payload_b58)
                .into_vec()
                .map_err(|e| LinkError::MalformedPayload(format!("payload parameter: {e}")))?,
        };

        Ok(open_json(&sealed, &shared)?)
    }
}
