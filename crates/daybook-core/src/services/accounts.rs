//! Registration, login, profile and password reset.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Role, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{MailMessage, Mailer, PasswordService, TokenService, UserRepository};

const ENTITY: &str = "User";

/// A freshly issued access token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

/// Profile edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::validation("Invalid email address"));
    }
    Ok(email.to_string())
}

fn duplicate_email(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::Duplicate("Email already registered".to_string()),
        other => other.into(),
    }
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    mailer: Arc<dyn Mailer>,
    reset_url: String,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        mailer: Arc<dyn Mailer>,
        reset_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            mailer,
            reset_url: reset_url.into(),
        }
    }

    fn session(&self, user: User) -> Result<Session, DomainError> {
        let access_token = self.tokens.generate_token(user.id, &user.email)?;
        Ok(Session {
            user,
            access_token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let email = validate_email(email)?;
        self.passwords.check_policy(password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let hash = self.passwords.hash(password)?;
        let user = self
            .users
            .create(User::new(email, hash))
            .await
            .map_err(duplicate_email)?;

        tracing::info!(user_id = %user.id, "User registered");
        self.session(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            return Err(DomainError::Unauthorized);
        }

        let user = if self.passwords.needs_rehash(&user.password_hash) {
            self.upgrade_hash(user, password).await
        } else {
            user
        };
        self.session(user)
    }

    /// Re-hash a verified password under current settings. Failures only
    /// cost the upgrade, never the login.
    async fn upgrade_hash(&self, user: User, password: &str) -> User {
        let mut upgraded = user.clone();
        upgraded.password_hash = match self.passwords.hash(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Password re-hash failed");
                return user;
            }
        };
        upgraded.touch();

        match self.users.update(upgraded).await {
            Ok(stored) => {
                tracing::info!(user_id = %stored.id, "Password hash upgraded");
                stored
            }
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Storing upgraded hash failed");
                user
            }
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    /// Role of an authenticated caller, from the stored record.
    /// A token whose user no longer exists is treated as unauthenticated.
    pub async fn role_of(&self, id: Uuid) -> Result<Role, DomainError> {
        match self.users.find_by_id(id).await? {
            Some(user) => Ok(Role::from_user(&user)),
            None => Err(DomainError::Unauthorized),
        }
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<User, DomainError> {
        let mut user = self.get_user(id).await?;

        let email = changes.email.as_deref().map(validate_email).transpose()?;
        if let Some(password) = changes.password.as_deref() {
            user.password_hash = self.passwords.hash_new(password)?;
        }
        if let Some(email) = email {
            user.email = email;
        }
        user.touch();

        self.users.update(user).await.map_err(duplicate_email)
    }

    pub async fn set_profile_photo(&self, id: Uuid, photo_url: String) -> Result<User, DomainError> {
        let mut user = self.get_user(id).await?;
        user.photo_url = photo_url;
        user.touch();
        Ok(self.users.update(user).await?)
    }

    /// Mail a reset link to `email`.
    pub async fn forgot_password(&self, email: &str) -> Result<(), DomainError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: ENTITY,
                id: None,
            })?;

        let token = self.tokens.generate_reset_token(user.id)?;
        let message = MailMessage::password_reset(&user.email, &self.reset_url, &token);
        self.mailer
            .send(message)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Password reset link sent");
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), DomainError> {
        let id = self.tokens.validate_reset_token(token)?;
        self.passwords.check_policy(new_password)?;

        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::Unauthorized)?;
        user.password_hash = self.passwords.hash(new_password)?;
        user.touch();
        self.users.update(user).await?;

        tracing::info!(user_id = %id, "Password reset");
        Ok(())
    }
}
