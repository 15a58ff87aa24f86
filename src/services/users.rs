//! Authentication and member account service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{RegisterUser, UpdateProfile, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new member and return it with a fresh token
    pub async fn register(&self, user: RegisterUser) -> AppResult<(String, User)> {
        if self.repository.users.email_exists(&user.email).await? {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password = hash_password(&user.password)?;
        let created = self.repository.users.create(&user, &password).await?;

        tracing::info!(user_id = created.id, "Registered new member");

        let token = self.create_token_for_user(&created)?;
        Ok((token, created))
    }

    /// Authenticate by email and password and return a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(&user.password, password)? {
            tracing::warn!(user_id = user.id, "Failed login attempt");
            return Err(invalid_credentials());
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Create JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, Utc::now(), self.config.jwt_expiration_days)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Update own profile (name, contact, address)
    pub async fn update_profile(&self, user_id: i32, profile: UpdateProfile) -> AppResult<User> {
        let mut user = self.repository.users.get_by_id(user_id).await?;
        user.apply_profile(profile);
        self.repository.users.update_profile(&user).await
    }
}

fn invalid_credentials() -> AppError {
    AppError::Authentication("Invalid email or password".to_string())
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_hash_and_verify() {
        let hash = assert_ok!(hash_password("correct horse"));
        assert_ne!(hash, "correct horse");
        assert!(assert_ok!(verify_password(&hash, "correct horse")));
        assert!(!assert_ok!(verify_password(&hash, "wrong horse")));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        let err = assert_err!(verify_password("plaintext", "plaintext"));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
