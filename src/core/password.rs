//! Password hashing - Argon2id with configurable cost parameters.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`),
//! which carry their own parameters. Verification therefore works for hashes
//! produced under older policies, and [`PasswordPolicy::needs_rehash`] tells
//! the caller when such a hash should be upgraded.

use crate::errors::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

/// Current Argon2id cost parameters.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    params: Params,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordPolicy {
    /// Builds a policy from memory cost (KiB), iterations and lanes.
    ///
    /// # Errors
    /// Returns an error if argon2 rejects the combination (e.g. memory below
    /// eight blocks per lane).
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)?;
        Ok(Self { params })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.hasher().hash_password(plaintext.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Checks `plaintext` against `stored`.
    ///
    /// A mismatch is `Ok(false)`; only an unparseable `stored` value is an error.
    pub fn verify(&self, plaintext: &str, stored: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored)?;
        match self.hasher().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// True when `stored` was produced with another algorithm or other costs.
    pub fn needs_rehash(&self, stored: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored)?;
        if parsed.algorithm != Algorithm::Argon2id.ident()
            || parsed.version != Some(Version::V0x13.into())
        {
            return Ok(true);
        }

        let params = Params::try_from(&parsed)?;
        Ok(params.m_cost() != self.params.m_cost()
            || params.t_cost() != self.params.t_cost()
            || params.p_cost() != self.params.p_cost())
    }
}
