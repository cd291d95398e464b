//! Vehicle display formatting
//!
//! Formats vehicles for terminal output in table and detail views.

use crate::models::Vehicle;

/// Format a list of vehicles as a table
pub fn format_vehicle_list(vehicles: &[Vehicle]) -> String {
    if vehicles.is_empty() {
        return "No vehicles found.".to_string();
    }

    // Calculate column widths
    let name_width = vehicles
        .iter()
        .map(|v| v.brand.len() + v.model.len() + 1)
        .max()
        .unwrap_or(7)
        .max(7);

    let plate_width = vehicles
        .iter()
        .map(|v| v.license_plate.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:<name_width$}  {:>4}  {:<plate_width$}  {:<14}  {}\n",
        "ID",
        "Vehicle",
        "Year",
        "Plate",
        "Status",
        "Spot",
        name_width = name_width,
        plate_width = plate_width,
    ));

    output.push_str(&format!(
        "{:->4}  {:-<name_width$}  {:->4}  {:-<plate_width$}  {:-<14}  {:-<6}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        plate_width = plate_width,
    ));

    for vehicle in vehicles {
        output.push_str(&format!(
            "{:>4}  {:<name_width$}  {:>4}  {:<plate_width$}  {:<14}  {}\n",
            vehicle.id.get(),
            format!("{} {}", vehicle.brand, vehicle.model),
            vehicle.year,
            vehicle.license_plate,
            vehicle.status.to_string(),
            vehicle.parking_spot.as_deref().unwrap_or("-"),
            name_width = name_width,
            plate_width = plate_width,
        ));
    }

    output
}

/// Format a single vehicle's details
pub fn format_vehicle_details(vehicle: &Vehicle) -> String {
    let mut output = String::new();

    output.push_str(&format!("Vehicle: {} {}\n", vehicle.brand, vehicle.model));
    output.push_str(&format!("  ID:           {}\n", vehicle.id));
    output.push_str(&format!("  Year:         {}\n", vehicle.year));
    output.push_str(&format!("  Plate:        {}\n", vehicle.license_plate));
    output.push_str(&format!("  Status:       {}\n", vehicle.status));
    output.push_str(&format!(
        "  Parking Spot: {}\n",
        vehicle.parking_spot.as_deref().unwrap_or("(none)")
    ));
    if let Some(rate) = vehicle.daily_rate {
        output.push_str(&format!("  Daily Rate:   {:.2}\n", rate));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Added: {}\n",
        vehicle.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
