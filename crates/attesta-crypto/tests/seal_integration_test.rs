//! Integration tests for the sealing/opening protocol.
//!
//! This suite validates:
//! - Cryptographic correctness (seal/open roundtrips through converted
//!   identities)
//! - Determinism of the hash engine and canonicalization
//! - Tamper-evidence (no silent wrong plaintext, ever)
//! - Bundle transport format compliance

use attesta_core::DocumentMetadata;
use attesta_crypto::{
    canonicalize, cipher, core_hash, hash_file, signing_priv_to_exchange_priv,
    signing_pub_to_exchange_pub, wrap, CryptoError, SealedBundle,
};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

fn sample_metadata() -> DocumentMetadata {
    DocumentMetadata {
        title: "A".into(),
        author: "B".into(),
        subject: String::new(),
        producer: String::new(),
        num_pages: 1,
    }
}

/// Seal `file_bytes` for `recipient` and return the transportable bundle.
fn seal_for(recipient: &SigningKey, file_bytes: &[u8], metadata: DocumentMetadata) -> SealedBundle {
    let file_hash = hash_file(file_bytes);
    let core = core_hash(&metadata, &file_hash);

    let key = cipher::SymmetricKey::generate();
    let payload = cipher::encrypt(file_bytes, &key).unwrap();

    let exchange_pub = signing_pub_to_exchange_pub(recipient.verifying_key().as_bytes()).unwrap();
    let wrapped = wrap::seal(&key, &exchange_pub).unwrap();

    SealedBundle::assemble(
        metadata,
        file_hash,
        core,
        "QmIntegrationTest".into(),
        bs58::encode(recipient.verifying_key().as_bytes()).into_string(),
        payload,
        wrapped,
    )
}

/// Open a bundle with the recipient's signing seed.
fn open_with(bundle: &SealedBundle, recipient: &SigningKey) -> Result<Vec<u8>, CryptoError> {
    let exchange_priv = signing_priv_to_exchange_priv(&recipient.to_bytes())?;
    let key = wrap::open(&bundle.wrapped_key, &exchange_priv)?;
    cipher::decrypt(&bundle.ciphertext, &key, &bundle.nonce, &bundle.tag)
}

// ============================================================================
// Cryptographic correctness
// ============================================================================

#[test]
fn test_seal_open_roundtrip() {
    let recipient = SigningKey::generate(&mut OsRng);
    let file_bytes = b"%PDF-1.4 a very small certificate";

    let bundle = seal_for(&recipient, file_bytes, sample_metadata());
    let plaintext = open_with(&bundle, &recipient).unwrap();

    assert_eq!(plaintext.as_slice(), file_bytes.as_slice());
}

#[test]
fn test_roundtrip_survives_transport_encoding() {
    let recipient = SigningKey::generate(&mut OsRng);
    let file_bytes: Vec<u8> = (0u8..=255).cycle().take(4096).collect();

    let bundle = seal_for(&recipient, &file_bytes, sample_metadata());
    let reparsed = SealedBundle::parse(&bundle.to_bytes().unwrap()).unwrap();

    assert_eq!(reparsed, bundle);
    assert_eq!(open_with(&reparsed, &recipient).unwrap(), file_bytes);
}

#[test]
fn test_sealing_is_randomized() {
    let recipient = SigningKey::generate(&mut OsRng);
    let file_bytes = b"same document";

    let a = seal_for(&recipient, file_bytes, sample_metadata());
    let b = seal_for(&recipient, file_bytes, sample_metadata());

    // Fresh key, nonce and ephemeral wrap per seal
    assert_ne!(a.nonce, b.nonce);
    assert_ne!(a.ciphertext, b.ciphertext);
    assert_ne!(a.wrapped_key, b.wrapped_key);

    // But the content-addressed identity never changes
    assert_eq!(a.core_hash, b.core_hash);
    assert_eq!(a.file_hash, b.file_hash);
}

#[test]
fn test_expanded_secret_opens_like_seed() {
    let recipient = SigningKey::generate(&mut OsRng);
    let bundle = seal_for(&recipient, b"document", sample_metadata());

    let mut expanded = Vec::with_capacity(64);
    expanded.extend_from_slice(&recipient.to_bytes());
    expanded.extend_from_slice(recipient.verifying_key().as_bytes());

    let exchange_priv = signing_priv_to_exchange_priv(&expanded).unwrap();
    let key = wrap::open(&bundle.wrapped_key, &exchange_priv).unwrap();
    let plaintext = cipher::decrypt(&bundle.ciphertext, &key, &bundle.nonce, &bundle.tag).unwrap();

    assert_eq!(plaintext, b"document");
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_core_hash_matches_independent_computation() {
    // sha256(canonical_json(metadata) + file_hash) computed without going
    // through the hash engine.
    let file_bytes = b"%PDF-1.4 scenario document";
    let file_hash = hash_file(file_bytes);

    let canonical = r#"{"author":"B","num_pages":1,"producer":"","subject":"","title":"A"}"#;
    assert_eq!(canonicalize(&sample_metadata()), canonical);

    let expected = hex::encode(Sha256::digest(format!("{canonical}{file_hash}").as_bytes()));
    assert_eq!(core_hash(&sample_metadata(), &file_hash), expected);
}

#[test]
fn test_core_hash_stable_across_seals() {
    let recipient_a = SigningKey::generate(&mut OsRng);
    let recipient_b = SigningKey::generate(&mut OsRng);
    let file_bytes = b"identical bytes";

    let a = seal_for(&recipient_a, file_bytes, sample_metadata());
    let b = seal_for(&recipient_b, file_bytes, sample_metadata());

    // The core hash depends only on content and metadata, not on who the
    // bundle is sealed to.
    assert_eq!(a.core_hash, b.core_hash);
}

// ============================================================================
// Tamper-evidence and wrong keys
// ============================================================================

#[test]
fn test_wrong_recipient_gets_unwrap_failure() {
    let recipient = SigningKey::generate(&mut OsRng);
    let eve = SigningKey::generate(&mut OsRng);

    let bundle = seal_for(&recipient, b"confidential", sample_metadata());
    let result = open_with(&bundle, &eve);

    assert!(matches!(result, Err(CryptoError::UnwrapFailure)));
}

#[test]
fn test_tampered_ciphertext_is_authentication_failure() {
    let recipient = SigningKey::generate(&mut OsRng);
    let mut bundle = seal_for(&recipient, b"confidential", sample_metadata());

    bundle.ciphertext[0] ^= 0x01;
    let result = open_with(&bundle, &recipient);

    assert!(matches!(result, Err(CryptoError::AuthenticationFailure)));
}

#[test]
fn test_tampered_tag_is_authentication_failure() {
    let recipient = SigningKey::generate(&mut OsRng);
    let mut bundle = seal_for(&recipient, b"confidential", sample_metadata());

    bundle.tag[0] ^= 0x01;
    let result = open_with(&bundle, &recipient);

    assert!(matches!(result, Err(CryptoError::AuthenticationFailure)));
}

#[test]
fn test_tampered_wrapped_key_is_unwrap_failure() {
    let recipient = SigningKey::generate(&mut OsRng);
    let mut bundle = seal_for(&recipient, b"confidential", sample_metadata());

    let last = bundle.wrapped_key.len() - 1;
    bundle.wrapped_key[last] ^= 0x01;
    let result = open_with(&bundle, &recipient);

    assert!(matches!(result, Err(CryptoError::UnwrapFailure)));
}

// ============================================================================
// Bundle transport format
// ============================================================================

#[test]
fn test_malformed_bundle_is_distinct_from_crypto_failures() {
    let result = SealedBundle::parse(b"{\"file_hash\": \"abc\"}");
    assert!(matches!(result, Err(CryptoError::MalformedBundle(_))));
}

#[test]
fn test_bundle_hashes_are_hex_text() {
    let recipient = SigningKey::generate(&mut OsRng);
    let bundle = seal_for(&recipient, b"document", sample_metadata());

    assert_eq!(bundle.file_hash.len(), 64);
    assert_eq!(bundle.core_hash.len(), 64);
    assert!(hex::decode(&bundle.file_hash).is_ok());
    assert!(hex::decode(&bundle.core_hash).is_ok());
}
