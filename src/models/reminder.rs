//! Reminder model (insurance renewals, inspections, cleanings...)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ReminderId, VehicleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub vehicle_id: VehicleId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(
        id: ReminderId,
        vehicle_id: VehicleId,
        kind: impl Into<String>,
        description: Option<String>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            vehicle_id,
            kind: kind.into().trim().to_string(),
            description,
            due_date,
            status: ReminderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReminderStatus::Pending
    }

    /// Pending and past its due date
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && self.due_date < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_overdue() {
        let now = Utc::now();
        let mut reminder = Reminder::new(
            ReminderId::new(1),
            VehicleId::new(1),
            "insurance",
            None,
            now - Duration::days(1),
        );
        assert!(reminder.is_overdue(now));

        reminder.status = ReminderStatus::Completed;
        assert!(!reminder.is_overdue(now));
    }
}
