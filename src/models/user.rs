//! User model
//!
//! Users are the actors recorded on every history entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: String,
    ) -> Self {
        Self {
            id,
            username: username.into().trim().to_string(),
            email: email.into().trim().to_string(),
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Normalize a username or email for uniqueness checks
    pub fn normalize(value: &str) -> String {
        value.trim().to_lowercase()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.username.is_empty() {
            return Err("Username is required".into());
        }
        if self.username.len() > 80 {
            return Err("Username is too long (max 80 chars)".into());
        }
        if self.username.chars().any(char::is_whitespace) {
            return Err("Username cannot contain whitespace".into());
        }
        if self.email.len() > 120 {
            return Err("Email is too long (max 120 chars)".into());
        }
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(format!("Invalid email address: {}", self.email)),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}
