//! Credential validation for the auth route.
//!
//! # Configuration
//!
//! Set `PACERD_USERS` environment variable with format:
//! ```text
//! user1:password1:group1,group2;user2:password2
//! ```
//!
//! The group list is optional; a user without one belongs to no groups.

use std::collections::HashMap;
use std::sync::RwLock;

/// Validates user credentials.
pub trait Authenticator: Send + Sync {
    /// Validate credentials. On success returns the user's group
    /// memberships, on failure `None`.
    fn authenticate(&self, username: &str, password: &str) -> Option<Vec<String>>;
}

#[derive(Debug, Clone)]
struct UserRecord {
    password: String,
    groups: Vec<String>,
}

/// Authenticator backed by a configured user table.
#[derive(Debug, Default)]
pub struct StaticAuthenticator {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl StaticAuthenticator {
    /// Create an empty authenticator; every login fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with no group memberships.
    pub fn register_user(&self, username: impl Into<String>, password: impl Into<String>) {
        self.register_user_with_groups(username, password, Vec::new());
    }

    /// Register a user together with their group memberships.
    pub fn register_user_with_groups(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
        groups: Vec<String>,
    ) {
        self.users.write().unwrap().insert(
            username.into(),
            UserRecord {
                password: password.into(),
                groups,
            },
        );
    }

    /// Load users from an environment variable.
    ///
    /// Format: `user1:password1:group1,group2;user2:password2`
    pub fn from_env(env_var: &str) -> Self {
        let auth = Self::new();
        if let Ok(users_str) = std::env::var(env_var) {
            for entry in users_str.split(';') {
                let entry = entry.trim();
                if entry.is_empty() {
                    continue;
                }
                if let Some((user, rest)) = entry.split_once(':') {
                    if user.is_empty() {
                        continue;
                    }
                    let (password, groups) = match rest.split_once(':') {
                        Some((password, group_list)) => (
                            password,
                            group_list
                                .split(',')
                                .map(str::trim)
                                .filter(|g| !g.is_empty())
                                .map(str::to_string)
                                .collect(),
                        ),
                        None => (rest, Vec::new()),
                    };
                    auth.register_user_with_groups(user.trim(), password, groups);
                }
            }
        }
        auth
    }

    /// Load from the default environment variable `PACERD_USERS`.
    pub fn from_default_env() -> Self {
        Self::from_env("PACERD_USERS")
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.users.read().unwrap().len()
    }
}

impl Authenticator for StaticAuthenticator {
    fn authenticate(&self, username: &str, password: &str) -> Option<Vec<String>> {
        self.users
            .read()
            .unwrap()
            .get(username)
            .filter(|record| record.password == password)
            .map(|record| record.groups.clone())
    }
}
