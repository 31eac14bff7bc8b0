//! Argon2id password hashing.
//!
//! The async entry points run hashing on the blocking thread pool.

use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngExt;

use crate::error::AuthError;

const SALT_LEN: usize = 16;

/// Verified against when no stored hash exists, so unknown accounts cost the
/// same as wrong passwords.
const DUMMY_PASSWORD: &str = "lectio-dummy-password";

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl WorkFactor {
    /// OWASP baseline for Argon2id (19 MiB, 2 passes, 1 lane).
    pub const RECOMMENDED: Self = Self {
        memory_kib: 19_456,
        iterations: 2,
        parallelism: 1,
    };

    /// Cheapest parameters Argon2 accepts. Tests only.
    pub const MINIMAL: Self = Self {
        memory_kib: Params::MIN_M_COST,
        iterations: Params::MIN_T_COST,
        parallelism: Params::MIN_P_COST,
    };
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self::RECOMMENDED
    }
}

#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    pub fn new(work: WorkFactor) -> Result<Self, AuthError> {
        let params = Params::new(work.memory_kib, work.iterations, work.parallelism, None)
            .map_err(|e| anyhow!("invalid argon2 parameters: {e}"))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = hash_with(&argon2, DUMMY_PASSWORD)?;
        Ok(Self {
            argon2,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hash with a fresh random salt. Blocks the calling thread.
    pub fn hash_blocking(&self, plaintext: &str) -> Result<String, AuthError> {
        hash_with(&self.argon2, plaintext)
    }

    /// Check `plaintext` against a PHC-formatted hash. Blocks the calling thread.
    ///
    /// A stored hash that fails to parse verifies as `false`.
    pub fn verify_blocking(&self, plaintext: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is not a valid PHC string");
                false
            }
        }
    }

    pub async fn hash(&self, plaintext: String) -> Result<String, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_blocking(&plaintext))
            .await
            .context("password hashing task")?
    }

    pub async fn verify(&self, plaintext: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.clone();
        let valid = tokio::task::spawn_blocking(move || hasher.verify_blocking(&plaintext, &hash))
            .await
            .context("password verification task")?;
        Ok(valid)
    }

    /// Burn one verification against the dummy hash. Always `false`.
    pub async fn verify_dummy(&self, plaintext: String) -> Result<bool, AuthError> {
        let dummy = self.dummy_hash.to_string();
        self.verify(plaintext, dummy).await.map(|_| false)
    }
}

/// Pre-persist step for user writes: hash the password only when the incoming
/// field set carries one. `None` means "leave the stored hash alone".
pub async fn rehash_if_present(
    hasher: &PasswordHasher,
    password: Option<String>,
) -> Result<Option<String>, AuthError> {
    match password {
        Some(plaintext) => hasher.hash(plaintext).await.map(Some),
        None => Ok(None),
    }
}

fn hash_with(argon2: &Argon2<'static>, plaintext: &str) -> Result<String, AuthError> {
    let salt_bytes: [u8; SALT_LEN] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!("encode salt: {e}"))?;
    let hash = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}
