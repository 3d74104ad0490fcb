//! # attesta-crypto
//!
//! The cryptographic core of attesta: sealing a document into a
//! tamper-evident, confidentiality-protected bundle addressed by a
//! deterministic core hash, and opening that bundle again.
//!
//! ## Cryptographic Primitives
//!
//! - **Content encryption**: AES-256-GCM with a detached 128-bit tag
//! - **Key wrap**: anonymous sealed-box over X25519 ECDH + HKDF-SHA256
//! - **Identity conversion**: Ed25519 → X25519 via the Edwards↔Montgomery
//!   birational map, byte-compatible with libsodium
//! - **Hashing**: SHA-256 over file bytes and canonicalized metadata
//! - **Random generation**: OS CSPRNG for keys, nonces and ephemeral pairs
//!
//! ## Sealing pipeline
//!
//! ```text
//! file bytes ──► hash_file ─────────────┐
//! metadata ───► canonicalize ──► core_hash
//! file bytes ──► encrypt (fresh key) ──► ciphertext/nonce/tag
//! fresh key ───► wrap::seal(recipient) ─► wrapped_key
//!                                  └──► SealedBundle
//! ```
//!
//! Opening inverts it exactly: parse → unwrap → decrypt. Every operation
//! is a pure function of its inputs apart from the two explicit CSPRNG
//! draws (symmetric key, nonce), so concurrent seals and opens need no
//! coordination.

pub mod bundle;
pub mod cipher;
pub mod error;
pub mod hash;
pub mod identity;
pub mod wrap;

pub use bundle::SealedBundle;
pub use cipher::{decrypt, encrypt, EncryptedPayload, SymmetricKey};
pub use error::{CryptoError, CryptoResult};
pub use hash::{canonicalize, core_hash, hash_file, CANONICALIZATION_VERSION};
pub use identity::{signing_priv_to_exchange_priv, signing_pub_to_exchange_pub, IdentityInput};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use attesta_core::DocumentMetadata;
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    /// Seal a document end to end and open it again with the recipient's
    /// signing identity.
    #[test]
    fn test_full_seal_open_workflow() {
        let recipient = SigningKey::generate(&mut OsRng);
        let file_bytes = b"%PDF-1.4 degree certificate body";
        let metadata = DocumentMetadata {
            title: "Degree".into(),
            author: "University".into(),
            subject: "Graduation".into(),
            producer: "print service".into(),
            num_pages: 2,
        };

        // Seal
        let file_hash = hash_file(file_bytes);
        let core = core_hash(&metadata, &file_hash);

        let key = SymmetricKey::generate();
        let payload = encrypt(file_bytes, &key).unwrap();

        let exchange_pub =
            signing_pub_to_exchange_pub(recipient.verifying_key().as_bytes()).unwrap();
        let wrapped = wrap::seal(&key, &exchange_pub).unwrap();

        let bundle = SealedBundle::assemble(
            metadata.clone(),
            file_hash.clone(),
            core.clone(),
            "QmLocalTest".into(),
            bs58::encode(recipient.verifying_key().as_bytes()).into_string(),
            payload,
            wrapped,
        );

        // Transport round trip
        let parsed = SealedBundle::parse(&bundle.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, bundle);

        // Open
        let exchange_priv = signing_priv_to_exchange_priv(&recipient.to_bytes()).unwrap();
        let unwrapped = wrap::open(&parsed.wrapped_key, &exchange_priv).unwrap();
        let plaintext = decrypt(&parsed.ciphertext, &unwrapped, &parsed.nonce, &parsed.tag).unwrap();

        assert_eq!(plaintext.as_slice(), file_bytes.as_slice());

        // And verification still recomputes the same core hash
        assert_eq!(core_hash(&metadata, &hash_file(&plaintext)), core);
    }

    /// A stranger's signing identity cannot open the bundle.
    #[test]
    fn test_wrong_identity_cannot_open() {
        let recipient = SigningKey::generate(&mut OsRng);
        let eve = SigningKey::generate(&mut OsRng);

        let key = SymmetricKey::generate();
        let exchange_pub =
            signing_pub_to_exchange_pub(recipient.verifying_key().as_bytes()).unwrap();
        let wrapped = wrap::seal(&key, &exchange_pub).unwrap();

        let eve_priv = signing_priv_to_exchange_priv(&eve.to_bytes()).unwrap();
        assert!(matches!(
            wrap::open(&wrapped, &eve_priv),
            Err(CryptoError::UnwrapFailure)
        ));
    }
}
