//! Read-through interfaces the audit trail depends on.
//!
//! The diff engine never reaches into storage directly: it is handed an
//! [`EntityResolver`], and the recorder an [`ActorDirectory`]. The storage
//! coordinator implements both; tests use in-memory fakes.

use serde_json::Value;

use crate::error::FleetResult;
use crate::models::UserId;

use super::entry::EntityType;

/// Fetches the current persisted state of an entity
pub trait EntityResolver {
    /// JSON snapshot of the entity, `None` when it does not exist or its
    /// type has no live lookup.
    fn snapshot(&self, entity_type: EntityType, entity_id: u64) -> FleetResult<Option<Value>>;
}

/// Answers whether an actor id refers to a real user
pub trait ActorDirectory {
    fn actor_exists(&self, actor_id: UserId) -> FleetResult<bool>;
}
