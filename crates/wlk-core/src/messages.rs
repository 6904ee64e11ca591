//! Wire payload schemas.
//!
//! The decrypted payloads form a small closed set of messages. Unknown or
//! missing fields are rejected at deserialization rather than accessed
//! optimistically.

use serde::{Deserialize, Serialize};

/// Decrypted body of the wallet's connect approval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectApproval {
    /// Wallet account address (base-58).
    pub public_key: String,
    /// Opaque session token issued by the wallet.
    pub session: String,
}

/// Plaintext body of a sign-and-send request, sealed before it enters the
/// URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignRequest {
    /// Session token from the connect approval.
    pub session: String,
    /// Unsigned transaction bytes, base-58 encoded. Opaque to this crate.
    pub transaction: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_approval_rejects_unknown_fields() {
        let json = r#"{"public_key":"addr1","session":"tok123","extra":true}"#;
        assert!(serde_json::from_str::<ConnectApproval>(json).is_err());
    }

    #[test]
    fn test_connect_approval_rejects_missing_fields() {
        let json = r#"{"public_key":"addr1"}"#;
        assert!(serde_json::from_str::<ConnectApproval>(json).is_err());
    }

    #[test]
    fn test_sign_request_round_trip() {
        let request = SignRequest {
            session: "tok123".into(),
            transaction: "3mJr7AoUXx2Wqd".into(),
        };

        let json = serde_json::to_string(&request).unwrap();
        let back: SignRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
