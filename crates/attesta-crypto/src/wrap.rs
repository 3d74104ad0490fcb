//! Anonymous key wrap: sealing a symmetric key to a recipient identity.
//!
//! The sealer may not hold any durable key pair, so the wrap is anonymous
//! public-key encryption in the sealed-box style:
//!
//! 1. Generate an ephemeral X25519 keypair — never reused.
//! 2. shared = DH(ephemeral_secret, recipient_exchange_pub)
//! 3. wrap key = HKDF-SHA256(salt = ephemeral_pub, ikm = shared,
//!    info = "attesta-key-wrap-v1")
//! 4. nonce = SHA-256(ephemeral_pub ‖ recipient_pub)[0..12] — derived
//!    deterministically from the two public keys, so it never needs to be
//!    transmitted. Safe because the wrap key itself is unique per
//!    ephemeral keypair.
//! 5. wrapped = ephemeral_pub(32) ‖ AES-256-GCM(symmetric_key)(48)
//!
//! Opening recomputes the same shared secret from the recipient's private
//! exchange key and the transmitted ephemeral public key. The recipient is
//! identified only by a long-term Ed25519 signing key; callers convert it
//! with [`crate::identity`] before wrapping.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::Zeroize;

use crate::cipher::{SymmetricKey, KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::error::{CryptoError, CryptoResult};

/// Domain separation context for the wrap-key HKDF. Versioned: changing it
/// makes every existing wrapped key unopenable.
const WRAP_INFO: &[u8] = b"attesta-key-wrap-v1";

/// Ephemeral public key length, prepended to the wrapped ciphertext.
const EPK_LEN: usize = 32;

/// Total wrapped-key length: ephemeral key ‖ encrypted key ‖ tag.
pub const WRAPPED_LEN: usize = EPK_LEN + KEY_LEN + TAG_LEN;

/// Derive the AEAD key that protects the symmetric key in transit.
fn derive_wrap_key(shared: &[u8; 32], ephemeral_pub: &[u8; 32]) -> [u8; 32] {
    let hkdf = Hkdf::<Sha256>::new(Some(ephemeral_pub), shared);
    let mut key = [0u8; 32];
    // HKDF expand cannot fail with a 32-byte output
    hkdf.expand(WRAP_INFO, &mut key)
        .expect("HKDF expand failed - this should never happen with 32-byte output");
    key
}

/// Deterministic wrap nonce from the two public halves of the exchange.
fn wrap_nonce(ephemeral_pub: &[u8; 32], recipient_pub: &[u8; 32]) -> [u8; NONCE_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(ephemeral_pub);
    hasher.update(recipient_pub);
    let digest = hasher.finalize();

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&digest[..NONCE_LEN]);
    nonce
}

/// Seal a symmetric key to a recipient's X25519 exchange public key.
///
/// The output is `ephemeral_pub ‖ ciphertext ‖ tag` (80 bytes) and is the
/// `wrapped_key` field of the sealed bundle.
pub fn seal(key: &SymmetricKey, recipient_exchange_pub: &[u8; 32]) -> CryptoResult<Vec<u8>> {
    let ephemeral_secret = StaticSecret::random_from_rng(OsRng);
    let ephemeral_pub = X25519Public::from(&ephemeral_secret);

    let shared = ephemeral_secret.diffie_hellman(&X25519Public::from(*recipient_exchange_pub));

    let mut wrap_key = derive_wrap_key(shared.as_bytes(), ephemeral_pub.as_bytes());
    let nonce = wrap_nonce(ephemeral_pub.as_bytes(), recipient_exchange_pub);

    let cipher = Aes256Gcm::new((&wrap_key).into());
    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), key.as_bytes().as_slice())
        .map_err(|_| CryptoError::EncryptionFailure);
    wrap_key.zeroize();
    let sealed = sealed?;

    let mut wrapped = Vec::with_capacity(WRAPPED_LEN);
    wrapped.extend_from_slice(ephemeral_pub.as_bytes());
    wrapped.extend_from_slice(&sealed);
    Ok(wrapped)
}

/// Open a wrapped key with the recipient's X25519 exchange private key.
///
/// # Errors
///
/// Returns [`CryptoError::UnwrapFailure`] when the input is truncated, the
/// recipient key does not match, or the wrap has been corrupted. A key is
/// never returned unless authentication succeeded.
pub fn open(wrapped: &[u8], recipient_exchange_priv: &[u8; 32]) -> CryptoResult<SymmetricKey> {
    if wrapped.len() != WRAPPED_LEN {
        return Err(CryptoError::UnwrapFailure);
    }

    let mut ephemeral_pub = [0u8; EPK_LEN];
    ephemeral_pub.copy_from_slice(&wrapped[..EPK_LEN]);
    let sealed = &wrapped[EPK_LEN..];

    let recipient_secret = StaticSecret::from(*recipient_exchange_priv);
    let recipient_pub = X25519Public::from(&recipient_secret);
    let shared = recipient_secret.diffie_hellman(&X25519Public::from(ephemeral_pub));

    let mut wrap_key = derive_wrap_key(shared.as_bytes(), &ephemeral_pub);
    let nonce = wrap_nonce(&ephemeral_pub, recipient_pub.as_bytes());

    let cipher = Aes256Gcm::new((&wrap_key).into());
    let opened = cipher
        .decrypt(Nonce::from_slice(&nonce), sealed)
        .map_err(|_| CryptoError::UnwrapFailure);
    wrap_key.zeroize();
    let mut opened = opened?;

    if opened.len() != KEY_LEN {
        opened.zeroize();
        return Err(CryptoError::UnwrapFailure);
    }

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&opened);
    opened.zeroize();
    Ok(SymmetricKey::from_bytes(key))
}
