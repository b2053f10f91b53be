use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::users::{
    error::{AccountError, ValidationError},
    password::{HashError, PasswordHasher, MAX_PASSWORD_BYTES},
    repo::{parse_user_id, UserStore},
    repo_types::{NewUser, UserChanges, UserRecord, UserSummary},
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Emails are compared and stored trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn checked_email(raw: &str) -> Result<String, ValidationError> {
    let email = normalize_email(raw);
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email)
}

fn checked_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    Ok(username.to_string())
}

/// Length bounds are checked up front so an over-long password never costs a store call.
fn checked_password(raw: &str) -> Result<(), AccountError> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort.into());
    }
    if raw.len() > MAX_PASSWORD_BYTES {
        return Err(HashError::InputTooLong.into());
    }
    Ok(())
}

fn checked_id(raw: &str) -> Result<Uuid, ValidationError> {
    parse_user_id(raw).ok_or(ValidationError::InvalidIdentifier)
}

/// Partial update request. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// User account lifecycle: validation, hashing and store orchestration.
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Create an account. The email check and the insert are two separate
    /// store calls; concurrent registrations rely on the store's uniqueness
    /// constraint, reported as `DuplicateEmail` as well.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AccountError> {
        let username = checked_username(username)?;
        let email = checked_email(email)?;
        checked_password(password)?;

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AccountError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .store
            .insert(NewUser {
                username,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<UserRecord, AccountError> {
        let id = checked_id(id)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<UserSummary>, AccountError> {
        let users = self.store.find_all().await?;
        debug!(count = users.len(), "listed users");
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    pub async fn update(&self, id: &str, update: UserUpdate) -> Result<UserSummary, AccountError> {
        let id = checked_id(id)?;
        if update.is_empty() {
            return Err(ValidationError::NoFieldsProvided.into());
        }

        let username = update.username.as_deref().map(checked_username).transpose()?;
        let email = update.email.as_deref().map(checked_email).transpose()?;
        if let Some(password) = &update.password {
            checked_password(password)?;
        }

        if let Some(email) = &email {
            if let Some(owner) = self.store.find_by_email(email).await? {
                if owner.id != id {
                    // A missing target outranks the conflict.
                    if self.store.find_by_id(id).await?.is_none() {
                        return Err(AccountError::NotFound);
                    }
                    return Err(AccountError::DuplicateEmail);
                }
            }
        }

        let password_hash = update
            .password
            .as_deref()
            .map(|p| self.hasher.hash(p))
            .transpose()?;

        let changes = UserChanges {
            username,
            email,
            password_hash,
        };
        let user = self
            .store
            .update_fields(id, changes)
            .await?
            .ok_or(AccountError::NotFound)?;

        info!(user_id = %user.id, "user updated");
        Ok(user.into())
    }

    pub async fn delete(&self, id: &str) -> Result<(), AccountError> {
        let id = checked_id(id)?;
        if self.store.delete_by_id(id).await? == 0 {
            return Err(AccountError::NotFound);
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
