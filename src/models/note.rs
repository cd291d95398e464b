//! Free-text notes attached to a vehicle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{NoteId, VehicleId};

/// Maximum note length in characters
pub const MAX_NOTE_LENGTH: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub vehicle_id: VehicleId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(id: NoteId, vehicle_id: VehicleId, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            vehicle_id,
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check note content before it is stored
    pub fn validate_content(content: &str) -> Result<(), String> {
        if content.trim().is_empty() {
            return Err("Note content is required".into());
        }
        if content.chars().count() > MAX_NOTE_LENGTH {
            return Err(format!(
                "Note content is too long (max {} chars)",
                MAX_NOTE_LENGTH
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content() {
        assert!(Note::validate_content("Scratch on rear bumper").is_ok());
        assert!(Note::validate_content("   ").is_err());
        assert!(Note::validate_content(&"x".repeat(MAX_NOTE_LENGTH + 1)).is_err());
    }
}
