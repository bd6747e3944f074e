//! # Password Hashing
//!
//! Salted SHA-256 password digests.
//!
//! ## Stored Format
//!
//! ```text
//! sha256$<salt-hex>$<digest-hex>
//! ```
//!
//! where `digest = SHA-256(salt || password)` and the salt is 16 bytes from
//! the operating system RNG. Verification recomputes the digest and compares
//! it in constant time.

use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// A salted password digest in its stored string form.
///
/// Custom `Debug` redacts the value so hashes never reach the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plain-text password with a fresh random salt.
    pub fn generate(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        Self::with_salt(password, &salt)
    }

    fn with_salt(password: &str, salt: &[u8]) -> Self {
        let digest = salted_digest(salt, password);
        Self(format!("{SCHEME}${}${}", to_hex(salt), to_hex(&digest)))
    }

    /// Wrap a value read back from the store. The format is checked lazily
    /// by [`PasswordHash::verify`].
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The stored string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check a candidate password. Malformed stored values never verify.
    pub fn verify(&self, password: &str) -> bool {
        let mut parts = self.0.splitn(3, '$');
        let (Some(scheme), Some(salt_hex), Some(digest_hex)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        if scheme != SCHEME {
            return false;
        }
        let (Some(salt), Some(expected)) = (from_hex(salt_hex), from_hex(digest_hex)) else {
            return false;
        };
        let actual = salted_digest(&salt, password);
        if actual.len() != expected.len() {
            return false;
        }
        actual.as_slice().ct_eq(expected.as_slice()).into()
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}
