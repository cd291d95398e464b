//! User service
//!
//! Registration and credential checks. Passwords are stored as Argon2 PHC
//! strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{info, warn};

use crate::error::{FleetError, FleetResult};
use crate::models::User;
use crate::storage::Storage;

pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a user with a unique username and email
    pub fn register(&self, username: &str, email: &str, password: &str) -> FleetResult<User> {
        if password.is_empty() {
            return Err(FleetError::Validation("Password is required".into()));
        }
        if self.storage.users.find_by_username(username)?.is_some() {
            return Err(FleetError::Duplicate {
                entity_type: "User",
                identifier: username.trim().to_string(),
            });
        }
        if self.storage.users.find_by_email(email)?.is_some() {
            return Err(FleetError::Duplicate {
                entity_type: "Email",
                identifier: email.trim().to_string(),
            });
        }

        let password_hash = hash_password(password)?;

        let user = self.storage.users.insert_with(|id| {
            let user = User::new(id, username, email, password_hash);
            user.validate().map_err(FleetError::Validation)?;
            Ok(user)
        })?;
        self.storage.users.save()?;

        info!(user = %user.username, "user registered");
        Ok(user)
    }

    /// Check a username/password pair
    pub fn verify(&self, username: &str, password: &str) -> FleetResult<User> {
        let rejected = || FleetError::Auth("Invalid username or password".into());

        let user = self.storage.users.find_by_username(username)?.ok_or_else(rejected)?;
        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            warn!(user = %user.username, "password rejected");
            Err(rejected())
        }
    }

    pub fn find_by_username(&self, username: &str) -> FleetResult<Option<User>> {
        self.storage.users.find_by_username(username)
    }

    /// Resolve the acting user by name
    pub fn require_actor(&self, username: &str) -> FleetResult<User> {
        self.find_by_username(username)?
            .ok_or_else(|| FleetError::Auth(format!("Unknown user: {}", username.trim())))
    }

    pub fn list(&self) -> FleetResult<Vec<User>> {
        self.storage.users.all()
    }
}

fn hash_password(password: &str) -> FleetResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FleetError::Auth(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored: &str) -> FleetResult<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| FleetError::Storage(format!("Corrupt password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::create_test_storage;

    #[test]
    fn test_register_and_verify() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);

        let user = service.register("alice", "alice@example.com", "s3cret").unwrap();
        assert!(user.password_hash.starts_with("$argon2"));

        assert_eq!(service.verify("Alice", "s3cret").unwrap().id, user.id);
        assert!(matches!(
            service.verify("alice", "wrong").unwrap_err(),
            FleetError::Auth(_)
        ));
        assert!(matches!(
            service.verify("bob", "s3cret").unwrap_err(),
            FleetError::Auth(_)
        ));
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);
        service.register("alice", "alice@example.com", "pw").unwrap();

        assert!(matches!(
            service.register("ALICE", "other@example.com", "pw").unwrap_err(),
            FleetError::Duplicate { .. }
        ));
        assert!(matches!(
            service.register("bob", "Alice@Example.com", "pw").unwrap_err(),
            FleetError::Duplicate { .. }
        ));
        assert!(service.register("carol", "not-an-email", "pw").unwrap_err().is_validation());
    }

    #[test]
    fn test_require_actor() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);

        assert!(matches!(
            service.require_actor("ghost").unwrap_err(),
            FleetError::Auth(_)
        ));
    }
}
