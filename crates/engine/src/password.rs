//! Salted password hashing for user accounts.
//!
//! Raw passwords only ever live in memory long enough to be hashed with
//! bcrypt; the store only sees the resulting hash.

use std::fmt::Display;

use bcrypt::{hash, verify};

use crate::{EngineError, ResultEngine};

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default bcrypt cost.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `raw_password` with the given bcrypt `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to
    /// verify a password. Keep [`PasswordHash::DEFAULT_COST`] outside tests.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> ResultEngine<Self> {
        if raw_password.is_empty() {
            return Err(EngineError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        hash(raw_password, cost)
            .map(Self)
            .map_err(|err| EngineError::PasswordHash(err.to_string()))
    }

    /// Wrap a hash loaded from the store.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches this hash.
    pub fn verify(&self, raw_password: &str) -> ResultEngine<bool> {
        verify(raw_password, &self.0).map_err(|err| EngineError::PasswordHash(err.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
