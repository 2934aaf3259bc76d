// src/io/reporting.rs

use crate::simulation::engine::HistoryRecord;
use log::info;
use std::error::Error;
use std::io::Write;
use std::path::Path;

/// Writes the simulation history to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/run_1.csv").
/// * `data` - The history records from the simulation engine.
pub fn write_simulation_log(file_path: &str, data: &[HistoryRecord]) -> Result<(), Box<dyn Error>> {
    let path = Path::new(file_path);
    let file = std::fs::File::create(path)?;
    write_history(file, data)?;

    info!("exported {} rows to '{}'", data.len(), file_path);
    Ok(())
}

/// Serializes history records as CSV (with header row) into any writer.
pub fn write_history<W: Write>(writer: W, data: &[HistoryRecord]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in data {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
