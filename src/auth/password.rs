//! Password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`)
//! with a fresh random salt per call. Hashing is CPU-bound, so async callers
//! go through [`PasswordHasher::hash_blocking`] and
//! [`PasswordHasher::verify_blocking`], which run on tokio's blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::MarketError;

/// Upper bound on the memory cost (KiB) a stored hash may ask for.
const MAX_MEMORY_KIB: u32 = 256 * 1024;
/// Upper bound on the iteration count a stored hash may ask for.
const MAX_ITERATIONS: u32 = 16;
/// Upper bound on the lane count a stored hash may ask for.
const MAX_LANES: u32 = 8;

/// Hashes and verifies passwords.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher {
    /// Creates a hasher with a custom memory cost (KiB) and iteration count,
    /// using one lane.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Internal`] if Argon2 rejects the parameters.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, MarketError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| MarketError::Internal(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes `password` with a random salt.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Internal`] if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, MarketError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| MarketError::Internal(format!("password hashing failed: {e}")))
    }

    /// Returns `true` if `password` matches `stored`. The cost parameters are
    /// read from `stored`; unparseable hashes, and hashes asking for more
    /// work than the crate allows, never match.
    #[must_use]
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        let Ok(params) = Params::try_from(&parsed) else {
            return false;
        };
        if params.m_cost() > MAX_MEMORY_KIB
            || params.t_cost() > MAX_ITERATIONS
            || params.p_cost() > MAX_LANES
        {
            return false;
        }
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// [`PasswordHasher::hash`] on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Internal`] if hashing fails or the task is
    /// cancelled.
    pub async fn hash_blocking(&self, password: String) -> Result<String, MarketError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| MarketError::Internal(format!("password hashing task failed: {e}")))?
    }

    /// [`PasswordHasher::verify`] on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Internal`] if the task is cancelled.
    pub async fn verify_blocking(
        &self,
        password: String,
        stored: String,
    ) -> Result<bool, MarketError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| MarketError::Internal(format!("password check task failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn light() -> PasswordHasher {
        let Ok(hasher) = PasswordHasher::with_cost(64, 1) else {
            panic!("light params rejected");
        };
        hasher
    }

    #[test]
    fn correct_password_verifies() {
        let hasher = light();
        let Ok(stored) = hasher.hash("s3cret") else {
            panic!("hash failed");
        };
        assert!(stored.starts_with("$argon2id$"));
        assert!(hasher.verify("s3cret", &stored));
        assert!(!hasher.verify("wrong", &stored));
    }

    #[test]
    fn salt_differs_per_call() {
        let hasher = light();
        let (Ok(a), Ok(b)) = (hasher.hash("same"), hasher.hash("same")) else {
            panic!("hash failed");
        };
        assert_ne!(a, b);
    }

    #[test]
    fn cost_is_read_from_stored_hash() {
        let Ok(stored) = light().hash("pw") else {
            panic!("hash failed");
        };
        let Ok(other) = PasswordHasher::with_cost(128, 2) else {
            panic!("params rejected");
        };
        assert!(other.verify("pw", &stored));
    }

    #[test]
    fn malformed_or_oversized_hash_never_matches() {
        let hasher = light();
        assert!(!hasher.verify("pw", ""));
        assert!(!hasher.verify("pw", "sha256$1$abc$def"));
        assert!(!hasher.verify("pw", "$argon2id$v=19$m=64,t=1,p=1$bad"));
        assert!(!hasher.verify(
            "pw",
            "$argon2id$v=19$m=4194304,t=1,p=1$c29tZXNhbHQ$0123456789abcdef0123456789abcdef0123456789A"
        ));
    }

    #[test]
    fn zero_cost_is_rejected() {
        assert!(matches!(
            PasswordHasher::with_cost(0, 0),
            Err(MarketError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn blocking_wrappers_agree_with_sync_calls() {
        let hasher = light();
        let Ok(stored) = hasher.hash_blocking("s3cret".to_string()).await else {
            panic!("hash failed");
        };
        assert!(matches!(
            hasher
                .verify_blocking("s3cret".to_string(), stored.clone())
                .await,
            Ok(true)
        ));
        assert!(matches!(
            hasher.verify_blocking("nope".to_string(), stored).await,
            Ok(false)
        ));
    }
}
