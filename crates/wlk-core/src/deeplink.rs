//! Deep-link assembly and parsing for the wallet's universal-link surface.
//!
//! Paths and query parameter names are fixed by the wallet's published
//! deep-link interface; everything that crosses it is base-58 encoded.

use std::collections::HashMap;

use url::Url;

use crate::errors::LinkError;
use wlk_crypto::sealed::NONCE_LEN;

/// Path of the wallet's connect entry point, relative to the base URL.
pub const CONNECT_PATH: &str = "connect";
/// Path of the wallet's sign-and-send entry point.
pub const SIGN_AND_SEND_PATH: &str = "signAndSendTransaction";

/// Query parameter names shared by the request and callback URLs.
pub mod params {
    pub const DAPP_ENCRYPTION_PUBLIC_KEY: &str = "dapp_encryption_public_key";
    pub const WALLET_ENCRYPTION_PUBLIC_KEY: &str = "wallet_encryption_public_key";
    pub const CLUSTER: &str = "cluster";
    pub const APP_URL: &str = "app_url";
    pub const REDIRECT_LINK: &str = "redirect_link";
    pub const NONCE: &str = "nonce";
    pub const DATA: &str = "data";
    pub const PAYLOAD: &str = "payload";
}

/// Join a wallet entry-point path onto the configured base URL.
pub fn wallet_endpoint(base_url: &str, path: &str) -> Result<Url, LinkError> {
    let base = Url::parse(base_url).map_err(|e| LinkError::InvalidUrl(e.to_string()))?;
    base.join(path).map_err(|e| LinkError::InvalidUrl(e.to_string()))
}

/// Parse the query string of an inbound callback deep link into the
/// parameter map the connect handler consumes.
pub fn callback_params(url: &Url) -> HashMap<String, String> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Decode a base-58 query parameter carrying a 32-byte public key.
pub fn decode_public_key(encoded: &str) -> Result<[u8; 32], LinkError> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|_| LinkError::InvalidPublicKey)?;
    bytes.try_into().map_err(|_| LinkError::InvalidPublicKey)
}

/// Decode a base-58 query parameter carrying a 24-byte nonce.
pub fn decode_nonce(encoded: &str) -> Result<[u8; NONCE_LEN], LinkError> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| LinkError::MalformedPayload(format!("nonce parameter: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| LinkError::MalformedPayload("nonce must be 24 bytes".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_endpoint_join() {
        let url = wallet_endpoint("https://backpack.app/ul/v1/", CONNECT_PATH).unwrap();
        assert_eq!(url.as_str(), "https://backpack.app/ul/v1/connect");

        let url = wallet_endpoint("https://backpack.app/ul/v1/", SIGN_AND_SEND_PATH).unwrap();
        assert_eq!(url.as_str(), "https://backpack.app/ul/v1/signAndSendTransaction");
    }

    #[test]
    fn test_wallet_endpoint_rejects_garbage() {
        assert!(matches!(
            wallet_endpoint("not a url", CONNECT_PATH),
            Err(LinkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_callback_params_extraction() {
        let url = Url::parse("exp://localhost:8081/--/onConnect?nonce=abc&data=def").unwrap();
        let query = callback_params(&url);

        assert_eq!(query.get("nonce").map(String::as_str), Some("abc"));
        assert_eq!(query.get("data").map(String::as_str), Some("def"));
    }

    #[test]
    fn test_decode_public_key_lengths() {
        let good = bs58::encode([5u8; 32]).into_string();
        assert_eq!(decode_public_key(&good).unwrap(), [5u8; 32]);

        let short = bs58::encode([5u8; 16]).into_string();
        assert!(matches!(
            decode_public_key(&short),
            Err(LinkError::InvalidPublicKey)
        ));

        assert!(matches!(
            decode_public_key("0OIl not base58"),
            Err(LinkError::InvalidPublicKey)
        ));
    }

    #[test]
    fn test_decode_nonce_lengths() {
        let good = bs58::encode([9u8; 24]).into_string();
        assert_eq!(decode_nonce(&good).unwrap(), [9u8; 24]);

        let wrong = bs58::encode([9u8; 12]).into_string();
        assert!(matches!(
            decode_nonce(&wrong),
            Err(LinkError::MalformedPayload(_))
        ));
    }
}
