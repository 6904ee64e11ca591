
#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::agreement::derive_shared_secret;
    use crate::error::CryptoError;
    use crate::keys::EphemeralKeypair;
    use crate::sealed::{open, seal};

    proptest! {
        // ECDH symmetry: both parties derive identical bytes for all
        // secret scalar pairs.
        #[test]
        fn test_agreement_symmetry(
            a_secret in any::<[u8; 32]>(),
            b_secret in any::<[u8; 32]>()
        ) {
            let a = EphemeralKeypair::from_secret_bytes(a_secret);
            let b = EphemeralKeypair::from_secret_bytes(b_secret);

            let ab = derive_shared_secret(&a.secret_bytes(), &b.public()).unwrap();
            let ba = derive_shared_secret(&b.secret_bytes(), &a.public()).unwrap();

            prop_assert_eq!(ab.as_bytes(), ba.as_bytes());
        }

        // Codec round trip for arbitrary payloads.
        #[test]
        fn test_seal_open_round_trip(
            a_secret in any::<[u8; 32]>(),
            b_secret in any::<[u8; 32]>(),
            payload in any::<Vec<u8>>()
        ) {
            let a = EphemeralKeypair::from_secret_bytes(a_secret);
            let b = EphemeralKeypair::from_secret_bytes(b_secret);
            let shared = derive_shared_secret(&a.secret_bytes(), &b.public()).unwrap();

            let message = seal(&payload, &shared).unwrap();
            let recovered = open(&message, &shared).unwrap();

            prop_assert_eq!(recovered, payload);
        }

        // Flipping any single bit of the ciphertext fails authentication;
        // a different valid-looking payload never comes back.
        #[test]
        fn test_ciphertext_bit_flip_detected(
            a_secret in any::<[u8; 32]>(),
            b_secret in any::<[u8; 32]>(),
            payload in prop::collection::vec(any::<u8>(), 1..256),
            bit in any::<u16>()
        ) {
            let a = EphemeralKeypair::from_secret_bytes(a_secret);
            let b = EphemeralKeypair::from_secret_bytes(b_secret);
            let shared = derive_shared_secret(&a.secret_bytes(), &b.public()).unwrap();

            let mut message = seal(&payload, &shared).unwrap();
            let bit = bit as usize % (message.ciphertext.len() * 8);
            message.ciphertext[bit / 8] ^= 1 << (bit % 8);

            prop_assert!(matches!(
                open(&message, &shared),
                Err(CryptoError::DecryptionFailed)
            ));
        }

        // Flipping any single bit of the nonce fails authentication.
        #[test]
        fn test_nonce_bit_flip_detected(
            a_secret in any::<[u8; 32]>(),
            b_secret in any::<[u8; 32]>(),
            payload in prop::collection::vec(any::<u8>(), 1..256),
            bit in 0usize..(24 * 8)
        ) {
            let a = EphemeralKeypair::from_secret_bytes(a_secret);
            let b = EphemeralKeypair::from_secret_bytes(b_secret);
            let shared = derive_shared_secret(&a.secret_bytes(), &b.public()).unwrap();

            let mut message = seal(&payload, &shared).unwrap();
            message.nonce[bit / 8] ^= 1 << (bit % 8);

            prop_assert!(matches!(
                open(&message, &shared),
                Err(CryptoError::DecryptionFailed)
            ));
        }

        // A secret derived from a different keypair pair never opens the
        // message.
        #[test]
        fn test_wrong_key_rejected(
            a_secret in any::<[u8; 32]>(),
            b_secret in any::<[u8; 32]>(),
            c_secret in any::<[u8; 32]>(),
            payload in any::<Vec<u8>>()
        ) {
            prop_assume!(b_secret != c_secret);

            let a = EphemeralKeypair::from_secret_bytes(a_secret);
            let b = EphemeralKeypair::from_secret_bytes(b_secret);
            let c = EphemeralKeypair::from_secret_bytes(c_secret);

            let right = derive_shared_secret(&a.secret_bytes(), &b.public()).unwrap();
            let wrong = derive_shared_secret(&a.secret_bytes(), &c.public()).unwrap();
            prop_assume!(right.as_bytes() != wrong.as_bytes());

            let message = seal(&payload, &right).unwrap();
            prop_assert!(matches!(
                open(&message, &wrong),
                Err(CryptoError::DecryptionFailed)
            ));
        }
    }
}
