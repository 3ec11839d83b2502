//! Password-based encryption of messages before they are hidden.
//!
//! - Argon2id derives a 256-bit key from the password and a random salt
//! - ChaCha20-Poly1305 encrypts and authenticates the message
//!
//! The token is base64 text, so it never contains the zero-bit run that
//! terminates a frame.

use argon2::Argon2;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

/// Salt size for Argon2.
pub const SALT_SIZE: usize = 16;

/// Nonce size for ChaCha20Poly1305.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 tag size.
const TAG_SIZE: usize = 16;

/// Errors that can occur during encryption and decryption.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Any decryption failure. The cause is deliberately not reported.
    #[error("Decryption failed: wrong password or corrupted data")]
    WrongPasswordOrCorrupted,
}

fn derive_key(password: &str, salt: &[u8]) -> Option<Zeroizing<[u8; 32]>> {
    let mut key = Zeroizing::new([0u8; 32]);
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut *key)
        .ok()?;
    Some(key)
}

/// Encrypts `message` and returns `base64(salt || nonce || ciphertext)`.
pub fn encrypt_message(message: &str, password: &str) -> Result<String, CryptoError> {
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(password, &salt)
        .ok_or_else(|| CryptoError::EncryptionFailed("key derivation failed".to_string()))?;
    let cipher = ChaCha20Poly1305::new_from_slice(&key[..])
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), message.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut token = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    token.extend_from_slice(&salt);
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(token))
}

/// Decrypts a token produced by [`encrypt_message`].
///
/// Malformed base64, a short token, a wrong password, tampering and non-UTF-8
/// plaintext all map to [`CryptoError::WrongPasswordOrCorrupted`].
pub fn decrypt_message(token: &str, password: &str) -> Result<String, CryptoError> {
    let raw = BASE64
        .decode(token.trim())
        .map_err(|_| CryptoError::WrongPasswordOrCorrupted)?;
    if raw.len() < SALT_SIZE + NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::WrongPasswordOrCorrupted);
    }

    let (salt, rest) = raw.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let key = derive_key(password, salt).ok_or(CryptoError::WrongPasswordOrCorrupted)?;
    let cipher = ChaCha20Poly1305::new_from_slice(&key[..])
        .map_err(|_| CryptoError::WrongPasswordOrCorrupted)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::WrongPasswordOrCorrupted)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::WrongPasswordOrCorrupted)
}
