use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;

use crate::errors::InternalError;

const PASSWORD_LENGTH: usize = 20;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                         abcdefghijklmnopqrstuvwxyz\
                         0123456789\
                         !@#$%^&*()_+-=[]{}|;:,.<>?";

/// Password generation and peppered Argon2id hashing
pub struct CryptoProvider {
    password_pepper: String,
}

impl CryptoProvider {
    /// # Arguments
    /// * `password_pepper` - Secret mixed into every hash (from SecretManager)
    pub fn new(password_pepper: impl Into<String>) -> Self {
        Self {
            password_pepper: password_pepper.into(),
        }
    }

    /// Generate a 20-character printable temporary password
    ///
    /// Draws from upper and lower case letters, digits and the symbols
    /// `!@#$%^&*()_+-=[]{}|;:,.<>?` using the thread-local CSPRNG.
    pub fn generate_secure_password(&self) -> String {
        let mut rng = rand::rng();
        (0..PASSWORD_LENGTH)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect()
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a password with a fresh salt
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Compare a password against a stored PHC hash string
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, InternalError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| InternalError::crypto("password_hash_parse", e.to_string()))?;
        Ok(self.argon2()?.verify_password(password.as_bytes(), &parsed).is_ok())
    }
}
