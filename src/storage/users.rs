//! User repository

use crate::error::FleetResult;
use crate::models::{User, UserId};

use super::table::{Record, Table};

impl Record for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

pub type UserRepository = Table<User>;

impl Table<User> {
    /// Find a user by username (case-insensitive)
    pub fn find_by_username(&self, username: &str) -> FleetResult<Option<User>> {
        let wanted = User::normalize(username);
        self.find(|u| User::normalize(&u.username) == wanted)
    }

    /// Find a user by email (case-insensitive)
    pub fn find_by_email(&self, email: &str) -> FleetResult<Option<User>> {
        let wanted = User::normalize(email);
        self.find(|u| User::normalize(&u.email) == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        repo.load().unwrap();

        repo.insert_with(|id| Ok(User::new(id, "Alice", "alice@example.com", "hash".into())))
            .unwrap();

        assert!(repo.find_by_username("alice").unwrap().is_some());
        assert!(repo.find_by_email("ALICE@example.com").unwrap().is_some());
        assert!(repo.find_by_username("bob").unwrap().is_none());
    }
}
