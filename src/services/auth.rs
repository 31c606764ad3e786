use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{JwtConfig, SecurityConfig};
use crate::models::User;
use crate::repositories::{RepoError, UserRepository};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown username")]
    UnknownUser,
    #[error("password does not match")]
    WrongPassword,
    #[error("invalid token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),
    #[error("failed to sign token: {0}")]
    Token(jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("hashing task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Token payload: who the caller is and what role they hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and checks bearer tokens, hashes and verifies passwords.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(jwt: &JwtConfig, security: &SecurityConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt.secret.as_bytes()),
            expires_in_hours: jwt.expires_in_hours,
            bcrypt_cost: security.bcrypt_cost,
        }
    }

    // bcrypt is CPU bound, keep it off the async workers
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hash)
    }

    pub async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        Ok(ok)
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expires_in_hours)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Token)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }

    /// Checks `username`/`password` against the stored user and returns a
    /// signed token on success.
    pub async fn authenticate(
        &self,
        users: &dyn UserRepository,
        username: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let user = users
            .get_by_username(username)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        if !self.verify_password(password, &user.password_hash).await? {
            warn!("rejected login for {}", username);
            return Err(AuthError::WrongPassword);
        }

        let token = self.issue_token(&user)?;
        info!("user {} logged in", username);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::user::ROLE_USER;
    use crate::repositories::{MemoryStore, Repository};

    fn service() -> AuthService {
        let config = Config::in_memory("test-secret");
        AuthService::new(&config.jwt, &config.security)
    }

    async fn store_with_user(auth: &AuthService, username: &str, password: &str) -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = Repository::<User>::create(
            &store,
            User {
                id: Uuid::nil(),
                username: username.to_string(),
                name: "Ana".to_string(),
                surname: "Jovanovic".to_string(),
                phone: "0601234567".to_string(),
                password_hash: auth.hash_password(password).await.unwrap(),
                role: ROLE_USER.to_string(),
                reservation_count: 0,
            },
        )
        .await
        .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_password() {
        let auth = service();
        let hash = auth.hash_password("pw1").await.unwrap();
        assert_ne!(hash, "pw1");
        assert!(auth.verify_password("pw1", &hash).await.unwrap());
        assert!(!auth.verify_password("pw2", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn correct_credentials_yield_token_with_identity() {
        let auth = service();
        let (store, user) = store_with_user(&auth, "ana77", "pw1").await;

        let token = auth.authenticate(&store, "ana77", "pw1").await.unwrap();
        assert!(!token.is_empty());

        let claims = auth.decode_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "ana77");
        assert_eq!(claims.role, ROLE_USER);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let auth = service();
        let (store, _) = store_with_user(&auth, "ana77", "pw1").await;
        let err = auth.authenticate(&store, "ana77", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::WrongPassword));
    }

    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let auth = service();
        let (store, _) = store_with_user(&auth, "ana77", "pw1").await;
        let err = auth.authenticate(&store, "marko", "pw1").await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownUser));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = Config::in_memory("other-secret");
        let other = AuthService::new(&config.jwt, &config.security);
        let user = User {
            id: Uuid::new_v4(),
            username: "ana77".to_string(),
            name: String::new(),
            surname: String::new(),
            phone: String::new(),
            password_hash: String::new(),
            role: ROLE_USER.to_string(),
            reservation_count: 0,
        };
        let token = other.issue_token(&user).unwrap();
        assert!(matches!(service().decode_token(&token), Err(AuthError::InvalidToken(_))));
    }
}
