//! Dashboard display formatting

use crate::services::DashboardStats;

pub fn format_dashboard(stats: &DashboardStats) -> String {
    let mut output = String::new();

    output.push_str("Fleet Overview\n");
    output.push_str("==============\n");
    output.push_str(&format!("Vehicles: {}\n", stats.total_vehicles));
    for (status, count) in &stats.by_status {
        output.push_str(&format!("  {:<16} {:>4}\n", status.to_string(), count));
    }

    output.push('\n');
    output.push_str(&format!("Active rentals:          {}\n", stats.active_rentals));
    output.push_str(&format!(
        "Scheduled maintenance:   {}\n",
        stats.scheduled_maintenances
    ));
    output.push_str(&format!("Pending reminders:       {}", stats.pending_reminders));
    if stats.overdue_reminders > 0 {
        output.push_str(&format!(" ({} overdue)", stats.overdue_reminders));
    }
    output.push('\n');

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleStatus;

    #[test]
    fn test_format_dashboard() {
        let stats = DashboardStats {
            total_vehicles: 3,
            by_status: vec![(VehicleStatus::Available, 2), (VehicleStatus::Rented, 1)],
            active_rentals: 1,
            scheduled_maintenances: 0,
            pending_reminders: 2,
            overdue_reminders: 1,
        };

        let output = format_dashboard(&stats);
        assert!(output.contains("Vehicles: 3"));
        assert!(output.contains("available"));
        assert!(output.contains("(1 overdue)"));
    }
}
