//! Credential check against the locally stored account list.
//!
//! This is a stub and not a security boundary: sessions are opaque random
//! tokens that never expire, and there is no rate limiting.

use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::{prefixed_id, Preferences, Role, Session, StoredUser, User};
use crate::services::latency::Latency;
use crate::storage::{keys, load_collection, save_collection, Storage, StorageError};
use crate::utils::error::AppError;

const DEFAULT_AVATAR: &str =
    "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?w=100&h=100&fit=crop&crop=face";

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct AuthService {
    storage: Arc<dyn Storage>,
    users: RwLock<Vec<StoredUser>>,
    sessions: RwLock<Vec<Session>>,
    latency: Latency,
}

impl AuthService {
    pub async fn load(storage: Arc<dyn Storage>, latency: Latency) -> Result<Self, StorageError> {
        let users = load_collection(storage.as_ref(), keys::USERS)
            .await?
            .unwrap_or_default();
        let sessions = load_collection(storage.as_ref(), keys::SESSIONS)
            .await?
            .unwrap_or_default();

        Ok(Self {
            storage,
            users: RwLock::new(users),
            sessions: RwLock::new(sessions),
            latency,
        })
    }

    async fn open_session(&self, user_id: &str) -> Result<String, StorageError> {
        let token = Uuid::new_v4().simple().to_string();
        let mut sessions = self.sessions.write().await;
        let mut staged = sessions.clone();
        staged.push(Session {
            token: token.clone(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        });
        save_collection(self.storage.as_ref(), keys::SESSIONS, &staged).await?;
        *sessions = staged;
        Ok(token)
    }

    /// Creates an account and signs it in. Fails if the email is taken.
    pub async fn register(&self, request: RegisterRequest) -> Result<(User, String), AppError> {
        self.latency.simulate(Latency::AUTH_MS).await;

        let email = normalize_email(&request.email);
        let name = request.name.trim();
        if !email.contains('@') {
            return Err(AppError::ValidationError(
                "A valid email is required".to_string(),
            ));
        }
        if name.is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError(
                "Name and password are required".to_string(),
            ));
        }

        let user = {
            let mut users = self.users.write().await;
            if users.iter().any(|stored| stored.user.email == email) {
                return Err(AppError::Conflict(
                    "An account with this email already exists".to_string(),
                ));
            }

            let salt = Uuid::new_v4().simple().to_string();
            let user = User {
                id: prefixed_id("user"),
                email,
                name: name.to_string(),
                role: request.role,
                avatar: Some(DEFAULT_AVATAR.to_string()),
                created_at: Utc::now(),
                preferences: Preferences::default(),
            };
            let mut staged = users.clone();
            staged.push(StoredUser {
                user: user.clone(),
                password_hash: hash_password(&salt, &request.password),
                password_salt: salt,
            });
            save_collection(self.storage.as_ref(), keys::USERS, &staged).await?;
            *users = staged;
            user
        };

        let token = self.open_session(&user.id).await?;
        info!(user_id = %user.id, role = ?user.role, "User registered");
        Ok((user, token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        self.latency.simulate(Latency::AUTH_MS).await;

        let email = normalize_email(email);
        let user = {
            let users = self.users.read().await;
            users
                .iter()
                .find(|stored| {
                    stored.user.email == email
                        && stored.password_hash == hash_password(&stored.password_salt, password)
                })
                .map(|stored| stored.user.clone())
        };

        let Some(user) = user else {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        };

        let token = self.open_session(&user.id).await?;
        info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// Drops the session; `false` when the token was unknown.
    pub async fn logout(&self, token: &str) -> Result<bool, AppError> {
        let mut sessions = self.sessions.write().await;
        let staged: Vec<Session> = sessions
            .iter()
            .filter(|session| session.token != token)
            .cloned()
            .collect();
        if staged.len() == sessions.len() {
            return Ok(false);
        }
        save_collection(self.storage.as_ref(), keys::SESSIONS, &staged).await?;
        *sessions = staged;
        Ok(true)
    }

    pub async fn current_user(&self, token: &str) -> Option<User> {
        let user_id = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .find(|session| session.token == token)
                .map(|session| session.user_id.clone())?
        };

        self.users
            .read()
            .await
            .iter()
            .find(|stored| stored.user.id == user_id)
            .map(|stored| stored.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    async fn service(storage: Arc<dyn Storage>) -> AuthService {
        AuthService::load(storage, Latency::disabled()).await.unwrap()
    }

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "hunter22".to_string(),
            name: "Linus".to_string(),
            role: Role::Organizer,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service(Arc::new(MemoryStorage::new())).await;
        let (user, token) = auth.register(registration("Linus@Example.com")).await.unwrap();
        assert_eq!(user.email, "linus@example.com");
        assert!(user.is_organizer());
        assert_eq!(auth.current_user(&token).await.unwrap().id, user.id);

        let (again, second_token) = auth
            .login("linus@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(again.id, user.id);
        assert_ne!(token, second_token);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let auth = service(Arc::new(MemoryStorage::new())).await;
        auth.register(registration("a@b.c")).await.unwrap();
        let result = auth.register(registration(" A@B.C ")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let auth = service(Arc::new(MemoryStorage::new())).await;
        auth.register(registration("a@b.c")).await.unwrap();
        let result = auth.login("a@b.c", "nope").await;
        assert!(matches!(result, Err(AppError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_password_not_stored_in_plaintext() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let auth = service(storage.clone()).await;
        auth.register(registration("a@b.c")).await.unwrap();

        let raw = storage.get(keys::USERS).await.unwrap().unwrap();
        assert!(!raw.contains("hunter22"));
    }

    #[tokio::test]
    async fn test_logout_and_sessions_persist() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let auth = service(storage.clone()).await;
        let (_, token) = auth.register(registration("a@b.c")).await.unwrap();

        let reloaded = service(storage).await;
        assert!(reloaded.current_user(&token).await.is_some());

        assert!(reloaded.logout(&token).await.unwrap());
        assert!(!reloaded.logout(&token).await.unwrap());
        assert!(reloaded.current_user(&token).await.is_none());
    }
}
