//! Change record data structures
//!
//! Defines the action kinds, the entity type tags and the ledger entry
//! itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::models::{ChangeRecordId, UserId};

use super::diff::summarize_changes;

/// Kinds of mutation that are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Create => write!(f, "CREATE"),
            ActionKind::Update => write!(f, "UPDATE"),
            ActionKind::Delete => write!(f, "DELETE"),
        }
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(format!("Unknown action kind: {}", s)),
        }
    }
}

/// Tag identifying the kind of entity a record refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Vehicle,
    Note,
    Maintenance,
    Rental,
    Reminder,
}

impl EntityType {
    /// Entity kinds whose history is recorded and whose live state can be
    /// used to resolve bare update values.
    pub fn is_tracked(&self) -> bool {
        matches!(self, Self::Vehicle | Self::Note | Self::Maintenance)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::Note => "note",
            Self::Maintenance => "maintenance",
            Self::Rental => "rental",
            Self::Reminder => "reminder",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vehicle" => Ok(Self::Vehicle),
            "note" => Ok(Self::Note),
            "maintenance" => Ok(Self::Maintenance),
            "rental" => Ok(Self::Rental),
            "reminder" => Ok(Self::Reminder),
            _ => Err(format!("Unknown entity type: {}", s)),
        }
    }
}

/// A record waiting to be appended; the ledger assigns its id
#[derive(Debug, Clone, PartialEq)]
pub struct NewChangeRecord {
    pub actor_id: UserId,
    pub action: ActionKind,
    pub entity_type: EntityType,
    pub entity_id: u64,
    pub changes: Value,
    /// Filled with the append time when absent
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewChangeRecord {
    pub fn new(
        actor_id: UserId,
        action: ActionKind,
        entity_type: EntityType,
        entity_id: u64,
        changes: Value,
    ) -> Self {
        Self {
            actor_id,
            action,
            entity_type,
            entity_id,
            changes,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Materialize with the id the ledger picked
    pub fn into_record(self, id: ChangeRecordId) -> ChangeRecord {
        ChangeRecord {
            id,
            actor_id: self.actor_id,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            changes: self.changes,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

/// One immutable ledger entry
///
/// For `create` and `delete` the `changes` value is whatever the caller
/// supplied. For `update` it maps each changed field to `{"old", "new"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub id: ChangeRecordId,
    pub actor_id: UserId,
    pub action: ActionKind,
    pub entity_type: EntityType,
    pub entity_id: u64,
    #[serde(default)]
    pub changes: Value,
    pub timestamp: DateTime<Utc>,
}

impl ChangeRecord {
    /// Format the record for terminal output
    pub fn format_human_readable(&self, actor: &str) -> String {
        let mut output = format!(
            "[{}] {} {} {} #{} by {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.id,
            self.action,
            self.entity_type,
            self.entity_id,
            actor
        );

        if self.action == ActionKind::Update {
            if let Some(summary) = summarize_changes(&self.changes) {
                output.push_str(&format!("\n  Changes: {}", summary));
            }
        }

        output
    }
}
