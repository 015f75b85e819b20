//! Encryption of stored FTP passwords.
//!
//! Blobs are `hex(iv):hex(tag):hex(ciphertext)` produced by AES-256-GCM
//! with a 16-byte IV. The key is derived from `ENCRYPTION_KEY` with scrypt
//! (N=16384, r=8, p=1) over the fixed salt `"salt"`, so blobs written by
//! earlier deployments of the dashboard still decrypt.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use rand::RngCore;

use crate::error::{EditorError, Result};

type Aes256Gcm16 = AesGcm<Aes256, U16>;

const IV_LEN: usize = 16;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;
const KEY_SALT: &[u8] = b"salt";
const SCRYPT_LOG_N: u8 = 14;

pub const ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_KEY";

pub struct PasswordCipher {
    key: [u8; KEY_LEN],
}

impl std::fmt::Debug for PasswordCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCipher").finish_non_exhaustive()
    }
}

impl PasswordCipher {
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(EditorError::Config(format!("{ENCRYPTION_KEY_ENV} must not be empty")));
        }
        let params = scrypt::Params::new(SCRYPT_LOG_N, 8, 1, KEY_LEN)
            .map_err(|e| EditorError::Crypto(format!("invalid scrypt parameters: {e}")))?;
        let mut key = [0u8; KEY_LEN];
        scrypt::scrypt(secret.as_bytes(), KEY_SALT, &params, &mut key)
            .map_err(|e| EditorError::Crypto(format!("key derivation failed: {e}")))?;
        Ok(Self { key })
    }

    pub fn from_env() -> Result<Self> {
        let secret = std::env::var(ENCRYPTION_KEY_ENV)?;
        Self::new(&secret)
    }

    fn cipher(&self) -> Result<Aes256Gcm16> {
        Aes256Gcm16::new_from_slice(&self.key)
            .map_err(|e| EditorError::Crypto(format!("invalid key: {e}")))
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut iv = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);

        let sealed = self
            .cipher()?
            .encrypt(GenericArray::from_slice(&iv), plaintext.as_bytes())
            .map_err(|_| EditorError::Crypto("encryption failed".to_string()))?;
        // aes-gcm appends the tag to the ciphertext
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

        Ok(format!(
            "{}:{}:{}",
            hex::encode(iv),
            hex::encode(tag),
            hex::encode(ciphertext)
        ))
    }

    pub fn decrypt(&self, blob: &str) -> Result<String> {
        let mut parts = blob.trim().split(':');
        let (Some(iv), Some(tag), Some(ciphertext), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(EditorError::Crypto("malformed encrypted value".to_string()));
        };

        let iv = decode_hex(iv, "iv")?;
        let tag = decode_hex(tag, "tag")?;
        let mut sealed = decode_hex(ciphertext, "ciphertext")?;
        if iv.len() != IV_LEN || tag.len() != TAG_LEN {
            return Err(EditorError::Crypto("malformed encrypted value".to_string()));
        }
        sealed.extend_from_slice(&tag);

        let plaintext = self
            .cipher()?
            .decrypt(GenericArray::from_slice(&iv), sealed.as_slice())
            .map_err(|_| EditorError::Crypto("decryption failed: wrong key or corrupted value".to_string()))?;
        String::from_utf8(plaintext)
            .map_err(|_| EditorError::Crypto("decrypted value is not UTF-8".to_string()))
    }
}

fn decode_hex(part: &str, what: &str) -> Result<Vec<u8>> {
    hex::decode(part).map_err(|e| EditorError::Crypto(format!("invalid {what} encoding: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_uses_fresh_iv() {
        let cipher = PasswordCipher::new("test-secret").unwrap();
        let a = cipher.encrypt("ftp-パスワード").unwrap();
        let b = cipher.encrypt("ftp-パスワード").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.split(':').count(), 3);
        assert_eq!(a.split(':').next().unwrap().len(), IV_LEN * 2);
        assert_eq!(cipher.decrypt(&a).unwrap(), "ftp-パスワード");
        assert_eq!(cipher.decrypt(&b).unwrap(), "ftp-パスワード");
    }

    #[test]
    fn tampering_is_detected() {
        let cipher = PasswordCipher::new("test-secret").unwrap();
        let blob = cipher.encrypt("secret").unwrap();
        let mut parts: Vec<String> = blob.split(':').map(str::to_string).collect();
        let flipped = if parts[2].starts_with('0') { "1" } else { "0" };
        parts[2].replace_range(0..1, flipped);
        let tampered = parts.join(":");

        assert!(matches!(cipher.decrypt(&tampered), Err(EditorError::Crypto(_))));
    }

    #[test]
    fn other_key_cannot_decrypt() {
        let blob = PasswordCipher::new("one").unwrap().encrypt("secret").unwrap();
        let other = PasswordCipher::new("two").unwrap();
        assert!(other.decrypt(&blob).is_err());
    }

    #[test]
    fn malformed_blobs_are_rejected() {
        let cipher = PasswordCipher::new("test-secret").unwrap();
        for blob in ["", "abc", "00:11", "zz:zz:zz", "00:11:22:33"] {
            assert!(
                matches!(cipher.decrypt(blob), Err(EditorError::Crypto(_))),
                "accepted {blob:?}"
            );
        }
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        assert!(matches!(PasswordCipher::new(""), Err(EditorError::Config(_))));
    }
}
