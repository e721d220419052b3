//! Password hashing and verification.
//!
//! Argon2 is CPU bound, so both operations run on the blocking thread pool.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Copy)]
pub struct CredentialStore {
    memory_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl CredentialStore {
    #[must_use]
    pub const fn new(config: &SecurityConfig) -> Self {
        Self {
            memory_cost_kib: config.argon2_memory_cost_kib,
            time_cost: config.argon2_time_cost,
            parallelism: config.argon2_parallelism,
        }
    }

    fn argon2(self) -> Result<Argon2<'static>> {
        let params = Params::new(self.memory_cost_kib, self.time_cost, self.parallelism, None)
            .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a password into a PHC string with a fresh random salt.
    pub async fn hash(&self, password: &str) -> Result<String> {
        let store = *self;
        let password = password.to_string();

        task::spawn_blocking(move || store.hash_blocking(&password))
            .await
            .context("Password hashing task failed")?
    }

    /// Returns `Ok(false)` on mismatch. Errors only when the digest cannot be parsed.
    pub async fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        let password = password.to_string();
        let digest = digest.to_string();

        task::spawn_blocking(move || verify_blocking(&password, &digest))
            .await
            .context("Password verification task failed")?
    }

    fn hash_blocking(self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

        Ok(hash.to_string())
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(&SecurityConfig::default())
    }
}

fn verify_blocking(password: &str, digest: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(digest).map_err(|e| anyhow::anyhow!("Invalid password hash: {e}"))?;

    // Parameters come from the digest itself
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
