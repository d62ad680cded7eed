//! Mock account management.
//!
//! Accounts are a username, a numeric id and a plaintext password. This is a
//! stand-in for a real account system: the password only guards against
//! typing someone else's name, not against anyone reading the store.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::store::{KeyValueStore, StoreError};

/// Key namespace owned by this service.
pub(crate) const PROFILES_NAMESPACE: &str = "profiles";

const USERS_KEY: &str = "profiles:users";

/// Checks whether `key` falls inside the account namespace.
pub(crate) fn is_reserved_key(key: &str) -> bool {
    key.split(':').next() == Some(PROFILES_NAMESPACE)
}

/// A registered account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct User {
    id: i64,
    username: String,
    #[getter(skip)]
    password: String,
}

impl User {
    /// Checks `password` against the stored one.
    pub fn verify(&self, password: &str) -> bool {
        self.password == password
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Error from an account operation.
#[derive(Debug, derive_more::Display)]
pub enum ProfileError {
    /// The name is already registered.
    #[display("Username '{}' is already taken", _0)]
    UsernameTaken(String),

    /// No account has this name.
    #[display("No account named '{}'", _0)]
    UnknownUser(String),

    /// The name is empty after trimming.
    #[display("Username must not be empty")]
    InvalidUsername,

    /// The password is empty.
    #[display("Password must not be empty")]
    EmptyPassword,

    /// The confirmation differs from the password.
    #[display("Passwords do not match")]
    PasswordMismatch,

    /// The password is wrong for this account.
    #[display("Invalid credentials")]
    InvalidCredentials,

    /// The store failed.
    #[display("{}", _0)]
    Store(StoreError),
}

impl std::error::Error for ProfileError {}

impl From<StoreError> for ProfileError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Service layer for account operations.
#[derive(Debug, Clone)]
pub struct ProfileService<S> {
    store: S,
}

impl<S: KeyValueStore> ProfileService<S> {
    /// Creates a service backed by `store`.
    #[instrument(skip(store))]
    pub fn new(store: S) -> Self {
        info!("Creating ProfileService");
        Self { store }
    }

    /// Lists all accounts in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Store`] if the store fails.
    #[instrument(skip(self))]
    pub fn list_users(&self) -> Result<Vec<User>, ProfileError> {
        let users = self
            .store
            .get_json::<Vec<User>>(USERS_KEY)?
            .unwrap_or_default();
        debug!(count = users.len(), "Users loaded");
        Ok(users)
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::InvalidUsername`] for a blank name.
    /// - [`ProfileError::EmptyPassword`] for an empty password.
    /// - [`ProfileError::PasswordMismatch`] if `confirmation` differs.
    /// - [`ProfileError::UsernameTaken`] if the name exists.
    #[instrument(skip(self, password, confirmation))]
    pub fn register(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<User, ProfileError> {
        let username = normalize(username)?;
        if password.is_empty() {
            return Err(ProfileError::EmptyPassword);
        }
        if password != confirmation {
            warn!(%username, "Password confirmation mismatch");
            return Err(ProfileError::PasswordMismatch);
        }

        let mut users = self.list_users()?;
        if users.iter().any(|u| u.username == username) {
            warn!(%username, "Username already taken");
            return Err(ProfileError::UsernameTaken(username));
        }

        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            username,
            password: password.to_string(),
        };
        users.push(user.clone());
        self.store.put_json(USERS_KEY, &users)?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Signs in with a name and password.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::UnknownUser`] if no account has this name.
    /// - [`ProfileError::InvalidCredentials`] if the password is wrong.
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<User, ProfileError> {
        let username = normalize(username)?;
        let user = self
            .list_users()?
            .into_iter()
            .find(|u| u.username == username)
            .ok_or_else(|| {
                warn!(%username, "Login for unknown user");
                ProfileError::UnknownUser(username.clone())
            })?;

        if !user.verify(password) {
            warn!(user_id = user.id, "Login with wrong password");
            return Err(ProfileError::InvalidCredentials);
        }

        info!(user_id = user.id, "User logged in");
        Ok(user)
    }
}

fn normalize(username: &str) -> Result<String, ProfileError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ProfileError::InvalidUsername);
    }
    Ok(trimmed.to_string())
}
