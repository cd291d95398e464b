//! Listings for the records hanging off a vehicle

use chrono::Utc;

use crate::models::{Maintenance, Note, Reminder, Rental};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_maintenance_list(maintenances: &[Maintenance]) -> String {
    if maintenances.is_empty() {
        return "No maintenance records found.".to_string();
    }

    let kind_width = maintenances.iter().map(|m| m.kind.len()).max().unwrap_or(4).max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:>7}  {:<10}  {:<kind_width$}  {:<11}  {}\n",
        "ID",
        "Vehicle",
        "Date",
        "Type",
        "Status",
        "Description",
        kind_width = kind_width,
    ));

    for m in maintenances {
        output.push_str(&format!(
            "{:>4}  {:>7}  {:<10}  {:<kind_width$}  {:<11}  {}\n",
            m.id.get(),
            m.vehicle_id.get(),
            m.date.format(DATE_FORMAT).to_string(),
            m.kind,
            m.status.to_string(),
            m.description.as_deref().unwrap_or(""),
            kind_width = kind_width,
        ));
    }

    output
}

pub fn format_rental_list(rentals: &[Rental]) -> String {
    if rentals.is_empty() {
        return "No rentals found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:>7}  {:<10}  {:<10}  {:<10}  {}\n",
        "ID", "Vehicle", "Start", "End", "Status", "Booking"
    ));

    for r in rentals {
        output.push_str(&format!(
            "{:>4}  {:>7}  {:<10}  {:<10}  {:<10}  {}\n",
            r.id.get(),
            r.vehicle_id.get(),
            r.start_date.format(DATE_FORMAT).to_string(),
            r.end_date.format(DATE_FORMAT).to_string(),
            r.status.to_string(),
            r.turo_booking_id.as_deref().unwrap_or("-"),
        ));
    }

    output
}

/// Overdue reminders are flagged with `!`
pub fn format_reminder_list(reminders: &[Reminder]) -> String {
    if reminders.is_empty() {
        return "No reminders.".to_string();
    }

    let now = Utc::now();
    let mut output = String::new();
    for r in reminders {
        let flag = if r.is_overdue(now) { "!" } else { " " };
        output.push_str(&format!(
            "{} #{:<4} {}  vehicle {}  {} [{}]",
            flag,
            r.id.get(),
            r.due_date.format(DATE_FORMAT),
            r.vehicle_id.get(),
            r.kind,
            r.status,
        ));
        if let Some(description) = &r.description {
            output.push_str(&format!(" - {}", description));
        }
        output.push('\n');
    }
    output
}

pub fn format_note_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes.".to_string();
    }

    let mut output = String::new();
    for note in notes {
        output.push_str(&format!(
            "#{} ({})\n  {}\n",
            note.id.get(),
            note.updated_at.format("%Y-%m-%d %H:%M UTC"),
            note.content.replace('\n', "\n  "),
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteId, ReminderId, VehicleId};
    use chrono::Duration;

    #[test]
    fn test_overdue_reminder_flagged() {
        let overdue = Reminder::new(
            ReminderId::new(1),
            VehicleId::new(2),
            "cleaning",
            None,
            Utc::now() - Duration::days(1),
        );
        let output = format_reminder_list(&[overdue]);
        assert!(output.starts_with("! #1"));
        assert!(output.contains("cleaning [pending]"));
    }

    #[test]
    fn test_note_list_indents_lines() {
        let note = Note::new(NoteId::new(3), VehicleId::new(1), "first\nsecond");
        let output = format_note_list(&[note]);
        assert!(output.contains("  first\n  second"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_maintenance_list(&[]), "No maintenance records found.");
        assert_eq!(format_rental_list(&[]), "No rentals found.");
    }
}
