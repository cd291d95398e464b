//! History CLI commands
//!
//! Listing, clearing and exporting the action history.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::audit::{EntityType, HistoryFilter};
use crate::display::format_history;
use crate::error::{FleetError, FleetResult};
use crate::export::{export_history_csv, export_history_json, export_history_yaml};
use crate::services::HistoryService;

use super::Session;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

/// Filters shared by `list` and `export`
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// vehicle, note or maintenance
    #[arg(short = 't', long)]
    pub entity_type: Option<String>,
    #[arg(short = 'i', long)]
    pub entity_id: Option<u64>,
    /// Maximum number of records
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl FilterArgs {
    fn to_filter(&self) -> FleetResult<HistoryFilter> {
        let mut filter = HistoryFilter::new();
        if let Some(entity_type) = &self.entity_type {
            let entity_type: EntityType = entity_type
                .parse()
                .map_err(FleetError::Validation)?;
            filter = filter.entity_type(entity_type);
        }
        if let Some(entity_id) = self.entity_id {
            filter = filter.entity_id(entity_id);
        }
        if let Some(limit) = self.limit {
            filter = filter.limit(limit);
        }
        Ok(filter)
    }
}

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommands {
    /// Show recorded changes, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print JSON listing views instead of text
        #[arg(long)]
        json: bool,
    },
    /// Remove your own history records
    Clear,
    /// Remove every history record
    Purge {
        /// Required; purging only ever applies to all users
        #[arg(long)]
        all: bool,
        #[arg(short, long)]
        force: bool,
    },
    /// Export history to a file or stdout
    Export {
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Handle a history command
pub fn handle_history_command(session: &Session, cmd: HistoryCommands) -> FleetResult<()> {
    let service = HistoryService::new(session.storage);

    match cmd {
        HistoryCommands::List { filter, json } => {
            let filter = filter.to_filter()?;
            if json {
                let views = service.list_views(&filter)?;
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                let records = service.list(&filter)?;
                let names = service.actor_names(&records)?;
                print!("{}", format_history(&records, &names));
            }
        }

        HistoryCommands::Clear => {
            let actor = session.actor()?;
            let removed = service.clear(actor)?;
            println!("Removed {} of your history record(s)", removed);
        }

        HistoryCommands::Purge { all, force } => {
            if !all {
                return Err(FleetError::Validation(
                    "Refusing to purge without --all. Use 'history clear' for your own records"
                        .into(),
                ));
            }
            if !force {
                println!(
                    "WARNING: this deletes all {} history record(s) from every user.",
                    service.count()?
                );
                println!("To proceed, run again with --force flag:");
                println!("  fleet history purge --all --force");
                return Ok(());
            }
            let removed = service.purge_all()?;
            println!("Purged {} history record(s)", removed);
        }

        HistoryCommands::Export {
            format,
            output,
            filter,
        } => {
            let filter = filter.to_filter()?;
            let count = match &output {
                Some(path) => {
                    let file = File::create(path).map_err(|e| {
                        FleetError::Export(format!(
                            "Failed to create file {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                    let mut writer = BufWriter::new(file);
                    let count = write_export(session, format, &filter, &mut writer)?;
                    writer
                        .flush()
                        .map_err(|e| FleetError::Export(format!("Failed to write export: {}", e)))?;
                    count
                }
                None => write_export(session, format, &filter, &mut io::stdout().lock())?,
            };

            if let Some(path) = output {
                println!("Exported {} history record(s) to: {}", count, path.display());
            }
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    session: &Session,
    format: ExportFormat,
    filter: &HistoryFilter,
    writer: &mut W,
) -> FleetResult<usize> {
    match format {
        ExportFormat::Csv => export_history_csv(session.storage, filter, writer),
        ExportFormat::Json => export_history_json(session.storage, filter, writer),
        ExportFormat::Yaml => export_history_yaml(session.storage, filter, writer),
    }
}
