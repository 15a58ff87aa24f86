//! User (library member) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Library member as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Apply a self-service profile update.
    ///
    /// Only name, contact and address can change; missing or blank values
    /// keep the current ones.
    pub fn apply_profile(&mut self, profile: UpdateProfile) {
        if let Some(name) = non_blank(profile.name) {
            self.name = name;
        }
        if let Some(contact) = non_blank(profile.contact) {
            self.contact = Some(contact);
        }
        if let Some(address) = non_blank(profile.address) {
            self.address = Some(address);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub contact: Option<String>,
    pub address: Option<String>,
}

/// Update own profile request. Email cannot be changed.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
}

/// JWT Claims for authenticated members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Claims for `user`, valid for `validity_days` from `now`
    pub fn for_user(user: &User, now: DateTime<Utc>, validity_days: u64) -> Self {
        let iat = now.timestamp();
        UserClaims {
            sub: user.id.to_string(),
            user_id: user.id,
            email: user.email.clone(),
            exp: iat + validity_days as i64 * 86_400,
            iat,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        User {
            id: 12,
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            password: "hash".to_string(),
            contact: Some("555-0100".to_string()),
            address: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let claims = UserClaims::for_user(&user(), Utc::now(), 30);
        let token = claims.create_token("secret").unwrap();

        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 12);
        assert_eq!(decoded.sub, "12");
        assert_eq!(decoded.exp - decoded.iat, 30 * 86_400);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let token = UserClaims::for_user(&user(), Utc::now(), 30)
            .create_token("secret")
            .unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issued = Utc::now() - Duration::days(31);
        let token = UserClaims::for_user(&user(), issued, 30)
            .create_token("secret")
            .unwrap();
        assert!(UserClaims::from_token(&token, "secret").is_err());
    }

    #[test]
    fn test_password_is_never_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ada@example.org");
    }

    #[test]
    fn test_apply_profile_keeps_blank_fields() {
        let mut u = user();
        u.apply_profile(UpdateProfile {
            name: Some("Ada Lovelace".to_string()),
            contact: Some("  ".to_string()),
            address: Some("12 St James's Square".to_string()),
        });

        assert_eq!(u.name, "Ada Lovelace");
        assert_eq!(u.contact.as_deref(), Some("555-0100"));
        assert_eq!(u.address.as_deref(), Some("12 St James's Square"));
        assert_eq!(u.email, "ada@example.org");
    }

    #[test]
    fn test_register_validation() {
        let req = RegisterUser {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            contact: None,
            address: None,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("name"));
    }
}
