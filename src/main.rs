use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use fleet::cli::{
    handle_backup_command, handle_history_command, handle_maintenance_command,
    handle_note_command, handle_rental_command, handle_reminder_command, handle_user_command,
    handle_vehicle_command, Session,
};
use fleet::config::{init_tracing, paths::FleetPaths, settings::Settings};
use fleet::display::format_dashboard;
use fleet::services::DashboardService;
use fleet::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "fleet",
    version,
    about = "Rental fleet management with a field-level action history",
    long_about = "Track vehicles, maintenance, rentals, reminders and notes. \
                  Every change to a vehicle, note or maintenance record is kept \
                  in an append-only history with old and new values per field."
)]
struct Cli {
    /// Act as this user (recorded in the history)
    #[arg(long = "as", value_name = "USER", env = "FLEET_USER", global = true)]
    actor: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init {
        /// Fill an empty fleet with demo data
        #[arg(long)]
        seed: bool,
    },

    /// Show current configuration and paths
    Config,

    /// User management commands
    #[command(subcommand)]
    User(fleet::cli::UserCommands),

    /// Vehicle management commands
    #[command(subcommand)]
    Vehicle(fleet::cli::VehicleCommands),

    /// Vehicle notes
    #[command(subcommand)]
    Note(fleet::cli::NoteCommands),

    /// Maintenance scheduling
    #[command(subcommand)]
    Maintenance(fleet::cli::MaintenanceCommands),

    /// Rental bookings
    #[command(subcommand)]
    Rental(fleet::cli::RentalCommands),

    /// Reminders (cleanings, inspections, renewals)
    #[command(subcommand)]
    Reminder(fleet::cli::ReminderCommands),

    /// Fleet overview
    Dashboard,

    /// Action history
    #[command(subcommand)]
    History(fleet::cli::HistoryCommands),

    /// Backup management
    #[command(subcommand)]
    Backup(fleet::cli::BackupCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = FleetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_filter);
    debug!(base_dir = %paths.base_dir().display(), "paths resolved");

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("Fleet Manager");
            println!();
            println!("Run 'fleet --help' for usage information.");
            println!("Run 'fleet init --seed' to start with a demo fleet.");
            return Ok(());
        }
    };

    match command {
        Commands::Init { seed } => {
            println!("Initializing fleet data at: {}", paths.base_dir().display());
            let seeded = initialize_storage(&paths, seed)?;
            println!("Initialization complete!");
            if seeded {
                println!("Demo fleet created. Run 'fleet vehicle list' to see it.");
            }
            println!("Register yourself with: fleet user add <username> <email>");
        }
        Commands::Config => {
            println!("Fleet Manager Configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("History file:     {}", paths.history_file().display());
            println!();
            println!("Settings:");
            println!(
                "  Default actor: {}",
                settings.default_actor.as_deref().unwrap_or("(none)")
            );
            println!("  Log filter:    {}", settings.log_filter);
            println!(
                "  Backups kept:  {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
        }
        Commands::Backup(cmd) => handle_backup_command(&paths, &settings, cmd)?,
        other => {
            let actor = cli.actor.or(settings.default_actor);
            run_with_storage(paths, actor, other)?;
        }
    }

    Ok(())
}

fn run_with_storage(paths: FleetPaths, actor: Option<String>, command: Commands) -> Result<()> {
    // Initialize storage
    let storage = Storage::new(paths)?;
    storage.load_all()?;

    let session = Session::new(&storage, actor);

    match command {
        Commands::User(cmd) => handle_user_command(&session, cmd)?,
        Commands::Vehicle(cmd) => handle_vehicle_command(&session, cmd)?,
        Commands::Note(cmd) => handle_note_command(&session, cmd)?,
        Commands::Maintenance(cmd) => handle_maintenance_command(&session, cmd)?,
        Commands::Rental(cmd) => handle_rental_command(&session, cmd)?,
        Commands::Reminder(cmd) => handle_reminder_command(&session, cmd)?,
        Commands::History(cmd) => handle_history_command(&session, cmd)?,
        Commands::Dashboard => {
            let stats = DashboardService::new(&storage).stats()?;
            print!("{}", format_dashboard(&stats));
        }
        Commands::Init { .. } | Commands::Config | Commands::Backup(_) => {}
    }

    Ok(())
}
