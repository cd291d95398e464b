//! Reminder repository

use crate::error::FleetResult;
use crate::models::{Reminder, ReminderId};

use super::table::{Record, Table};

impl Record for Reminder {
    type Id = ReminderId;

    fn id(&self) -> ReminderId {
        self.id
    }
}

pub type ReminderRepository = Table<Reminder>;

impl Table<Reminder> {
    /// Pending reminders, soonest due first
    pub fn pending(&self) -> FleetResult<Vec<Reminder>> {
        let mut rows = self.filter(Reminder::is_pending)?;
        rows.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(rows)
    }
}
