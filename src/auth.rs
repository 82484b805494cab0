//! # Login Gate
//!
//! A fixed list of tester accounts. There is no user management; the gate
//! only decides who is signed in and remembers the last username so the
//! login form can prefill it.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ScanbookError;
use crate::store::{KvStore, USERNAME_KEY};

/// Built-in tester accounts as (username, password).
const CREDENTIALS: [(&str, &str); 3] = [
    ("tester", "scan123"),
    ("lead", "lead123"),
    ("demo", "demo"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,

    #[error("unknown username or wrong password")]
    InvalidCredentials,
}

/// A signed-in tester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct LoginGate {
    credentials: Vec<(String, String)>,
}

impl Default for LoginGate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LoginGate {
    pub fn builtin() -> Self {
        Self::new(
            CREDENTIALS
                .iter()
                .map(|(u, p)| (u.to_string(), p.to_string())),
        )
    }

    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            credentials: credentials.into_iter().collect(),
        }
    }

    /// Check a username/password pair. Usernames are matched after trimming
    /// and ignoring case; passwords are exact.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let found = self
            .credentials
            .iter()
            .find(|(u, p)| u.eq_ignore_ascii_case(username) && p == password);

        match found {
            Some((u, _)) => {
                info!("[auth] {} signed in", u);
                Ok(Session {
                    username: u.clone(),
                })
            }
            None => {
                warn!("[auth] Rejected sign-in for '{}'", username);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Whether `username` is one of the known accounts.
    pub fn is_known(&self, username: &str) -> bool {
        self.credentials
            .iter()
            .any(|(u, _)| u.eq_ignore_ascii_case(username.trim()))
    }
}

/// Store the username of a new session.
pub fn remember(store: &dyn KvStore, session: &Session) -> Result<(), ScanbookError> {
    store.set_raw(USERNAME_KEY, session.username.clone())
}

/// The last remembered username, if any.
pub fn last_username(store: &dyn KvStore) -> Result<Option<String>, ScanbookError> {
    store.get_raw(USERNAME_KEY)
}
