//! Authenticated symmetric encryption for message payloads.
//!
//! Construction: AES-256-GCM under a SHA-256 digest of the caller's
//! passphrase, fresh 12-byte random nonce per encryption, transport encoding
//! base64(nonce ‖ ciphertext ‖ tag). Decryption verifies the tag before any
//! plaintext is released; tampered or malformed input yields a crypto error,
//! never corrupted plaintext.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::Rng;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use sha2::{Digest, Sha256};

use crate::error::EngineError;

const TAG_LEN: usize = 16;

/// Derive a 256-bit key from an arbitrary passphrase.
fn derive_key(passphrase: &str) -> Result<LessSafeKey, EngineError> {
    let digest = Sha256::digest(passphrase.as_bytes());
    let unbound = UnboundKey::new(&AES_256_GCM, digest.as_slice())
        .map_err(|_| EngineError::crypto("key derivation failed"))?;
    Ok(LessSafeKey::new(unbound))
}

pub fn encrypt(message: &str, passphrase: &str) -> Result<String, EngineError> {
    let key = derive_key(passphrase)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill(&mut nonce_bytes);
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = message.as_bytes().to_vec();
    key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| EngineError::crypto("encryption failed"))?;

    let mut framed = Vec::with_capacity(NONCE_LEN + in_out.len());
    framed.extend_from_slice(&nonce_bytes);
    framed.extend_from_slice(&in_out);
    Ok(STANDARD.encode(framed))
}

pub fn decrypt(encoded: &str, passphrase: &str) -> Result<String, EngineError> {
    let framed = STANDARD
        .decode(encoded.trim())
        .map_err(|e| EngineError::crypto(format!("invalid base64: {}", e)))?;
    if framed.len() < NONCE_LEN + TAG_LEN {
        return Err(EngineError::crypto("ciphertext too short"));
    }

    let key = derive_key(passphrase)?;
    let nonce = Nonce::try_assume_unique_for_key(&framed[..NONCE_LEN])
        .map_err(|_| EngineError::crypto("malformed nonce"))?;

    let mut in_out = framed[NONCE_LEN..].to_vec();
    let plaintext = key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| EngineError::crypto("integrity check failed"))?;

    String::from_utf8(plaintext.to_vec())
        .map_err(|_| EngineError::crypto("decrypted payload is not valid UTF-8"))
}

/// Fresh 256-bit key, base64-encoded. For callers that want to override the
/// configured default.
pub fn generate_key() -> String {
    let mut key = [0u8; 32];
    rand::thread_rng().fill(&mut key);
    STANDARD.encode(key)
}

/// SHA-256 digest of a message, hex-encoded.
pub fn hash_message(message: &str) -> String {
    hex::encode(Sha256::digest(message.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let message = "Hello, World! This is a test message.";
        let key = "test_key_123";
        let encrypted = encrypt(message, key).unwrap();
        let decrypted = decrypt(&encrypted, key).unwrap();
        assert_eq!(message, decrypted);
    }

    #[test]
    fn test_round_trip_unicode_and_empty() {
        for message in ["", "π ≈ 3.14159", "سلام دنیا", "line\nbreaks\tand tabs"] {
            let encrypted = encrypt(message, "k").unwrap();
            assert_eq!(decrypt(&encrypted, "k").unwrap(), message);
        }
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let a = encrypt("same message", "same key").unwrap();
        let b = encrypt("same message", "same key").unwrap();
        assert_ne!(a, b);
        assert_eq!(decrypt(&a, "same key").unwrap(), "same message");
        assert_eq!(decrypt(&b, "same key").unwrap(), "same message");
    }

    #[test]
    fn test_wrong_key_rejected() {
        let encrypted = encrypt("secret", "right key").unwrap();
        assert!(decrypt(&encrypted, "wrong key").is_err());
    }

    #[test]
    fn test_tamper_detection_every_byte() {
        let encrypted = encrypt("tamper target", "k").unwrap();
        let mut raw = STANDARD.decode(&encrypted).unwrap();
        for i in 0..raw.len() {
            raw[i] ^= 0x01;
            let flipped = STANDARD.encode(&raw);
            let result = decrypt(&flipped, "k");
            assert!(result.is_err(), "flipped byte {} decrypted", i);
            raw[i] ^= 0x01;
        }
    }

    #[test]
    fn test_malformed_input_rejected() {
        assert!(decrypt("not base64 !!!", "k").is_err());
        // Valid base64 but shorter than nonce + tag.
        assert!(decrypt(&STANDARD.encode([0u8; 8]), "k").is_err());
        assert!(decrypt("", "k").is_err());
    }

    #[test]
    fn test_generate_key_uniqueness() {
        let k1 = generate_key();
        let k2 = generate_key();
        assert_ne!(k1, k2);
        assert_eq!(k1.len(), 44); // base64 of 32 bytes
    }

    #[test]
    fn test_hash_message_stable() {
        let h1 = hash_message("Test message");
        let h2 = hash_message("Test message");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }
}
