//! File I/O utilities with atomic writes
//!
//! Table files are whole JSON documents rewritten atomically; the action
//! history is line-delimited JSON that only ever grows, except on clear.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::FleetError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, FleetError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| FleetError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| FleetError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), FleetError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| FleetError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

/// Rewrite a line-delimited JSON file atomically
pub fn write_json_lines_atomic<T, P>(path: P, rows: &[T]) -> Result<(), FleetError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), |writer| {
        for row in rows {
            serde_json::to_writer(&mut *writer, row)
                .map_err(|e| FleetError::Storage(format!("Failed to serialize row: {}", e)))?;
            writer
                .write_all(b"\n")
                .map_err(|e| FleetError::Storage(format!("Failed to write row: {}", e)))?;
        }
        Ok(())
    })
}

/// Append one JSON line and flush it to disk
pub fn append_json_line<T, P>(path: P, row: &T) -> Result<(), FleetError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| FleetError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let json = serde_json::to_string(row)
        .map_err(|e| FleetError::Storage(format!("Failed to serialize row: {}", e)))?;

    writeln!(file, "{}", json)
        .map_err(|e| FleetError::Storage(format!("Failed to append to {}: {}", path.display(), e)))?;

    file.flush()
        .map_err(|e| FleetError::Storage(format!("Failed to flush {}: {}", path.display(), e)))?;

    Ok(())
}

/// Read every row of a line-delimited JSON file, in file order.
///
/// A missing file reads as empty. Blank lines are skipped; a malformed line
/// is an error naming its line number.
pub fn read_json_lines<T, P>(path: P) -> Result<Vec<T>, FleetError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| FleetError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut rows = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            FleetError::Storage(format!(
                "Failed to read {} line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let row = serde_json::from_str(&line).map_err(|e| {
            FleetError::Storage(format!(
                "Failed to parse {} line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;
        rows.push(row);
    }

    Ok(rows)
}

fn ensure_parent(path: &Path) -> Result<(), FleetError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FleetError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

fn write_atomic<F>(path: &Path, write: F) -> Result<(), FleetError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), FleetError>,
{
    ensure_parent(path)?;

    // Temp file in the same directory so the rename stays atomic
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let file = File::create(&temp_path)
        .map_err(|e| FleetError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    write(&mut writer)?;

    writer
        .flush()
        .map_err(|e| FleetError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| FleetError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        FleetError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
