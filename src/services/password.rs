// SPDX-License-Identifier: MIT

//! Password hashing and policy checks (PBKDF2-HMAC-SHA256).

use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};
use std::num::NonZeroU32;

const PBKDF2_ITERATIONS: NonZeroU32 = NonZeroU32::new(100_000).unwrap();
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = digest::SHA256_OUTPUT_LEN;

/// Salt and digest, hex encoded for storage on the user document.
#[derive(Debug, Clone)]
pub struct HashedPassword {
    pub salt: String,
    pub hash: String,
}

/// Derive a fresh salted hash for a new password.
pub fn hash_password(password: &str) -> anyhow::Result<HashedPassword> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| anyhow::anyhow!("Failed to generate password salt"))?;

    let mut hash = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        PBKDF2_ITERATIONS,
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok(HashedPassword {
        salt: hex::encode(salt),
        hash: hex::encode(hash),
    })
}

/// Verify a password against the stored hex salt and digest.
pub fn verify_password(password: &str, salt_hex: &str, hash_hex: &str) -> bool {
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(hash) = hex::decode(hash_hex) else {
        return false;
    };

    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        PBKDF2_ITERATIONS,
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok()
}

/// Password policy: at least 6 characters, one special character and
/// one uppercase letter.
pub fn meets_policy(password: &str) -> bool {
    let has_special = password
        .chars()
        .any(|c| r#"!@#$%^&*(),.?":{}|<>"#.contains(c));
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    password.len() >= 6 && has_special && has_upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hashed = hash_password("Sup3r!secret").unwrap();
        assert!(verify_password("Sup3r!secret", &hashed.salt, &hashed.hash));
        assert!(!verify_password("wrong", &hashed.salt, &hashed.hash));
    }

    #[test]
    fn test_salts_are_unique() {
        let a = hash_password("Sup3r!secret").unwrap();
        let b = hash_password("Sup3r!secret").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_policy() {
        assert!(meets_policy("Abc!de"));
        assert!(!meets_policy("Ab!c")); // too short
        assert!(!meets_policy("abc!def")); // no uppercase
        assert!(!meets_policy("Abcdef")); // no special
    }

    #[test]
    fn test_verify_rejects_malformed_hex() {
        assert!(!verify_password("x", "not-hex", "not-hex"));
    }
}
