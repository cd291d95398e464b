//! History display formatting

use std::collections::HashMap;

use crate::audit::ChangeRecord;
use crate::models::UserId;
use crate::services::VehicleRemoval;

/// Format change records, newest first, with actor usernames
///
/// Actors that no longer exist are shown as `#<id>`.
pub fn format_history(
    records: &[ChangeRecord],
    actor_names: &HashMap<UserId, Option<String>>,
) -> String {
    if records.is_empty() {
        return "No history recorded.".to_string();
    }

    let mut output = String::new();
    for record in records {
        let actor = actor_names
            .get(&record.actor_id)
            .and_then(|name| name.clone())
            .unwrap_or_else(|| format!("#{}", record.actor_id));
        output.push_str(&record.format_human_readable(&actor));
        output.push('\n');
    }
    output
}

/// Summary printed after a vehicle delete
pub fn format_removal(removal: &VehicleRemoval) -> String {
    let mut output = format!("Deleted vehicle: {}\n", removal.vehicle.label());

    let cascaded = [
        ("maintenance record", removal.maintenances),
        ("rental", removal.rentals),
        ("reminder", removal.reminders),
        ("note", removal.notes),
    ];
    for (label, count) in cascaded.iter().filter(|(_, count)| *count > 0) {
        output.push_str(&format!(
            "  also removed {} {}{}\n",
            count,
            label,
            if *count == 1 { "" } else { "s" }
        ));
    }
    output
}
