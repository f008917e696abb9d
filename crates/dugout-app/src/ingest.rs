// Player file ingestion.
//
// Reads CSV or JSON exports into raw records and converts each one into a
// `Player`. CSV cells are kept as text so annotated values ("3 Stars",
// "$1,200,000") reach the normalizer untouched. Rows that cannot become a
// player are skipped with a warning.

use std::io::Read;
use std::path::Path;

use dugout_baseball::player::{ConversionOptions, Player};
use dugout_baseball::record::{RawRecord, RawValue};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

/// File formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(FileFormat::Csv),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Reader-based record loaders
// ---------------------------------------------------------------------------

fn csv_cell(cell: &str) -> RawValue {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        RawValue::Null
    } else {
        RawValue::Text(trimmed.to_string())
    }
}

fn records_from_csv<R: Read>(rdr: R) -> Result<Vec<RawRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        match result {
            Ok(row) => {
                let record: RawRecord = headers
                    .iter()
                    .zip(row.iter())
                    .filter(|(h, _)| !h.is_empty())
                    .map(|(h, cell)| (h.clone(), csv_cell(cell)))
                    .collect();
                records.push(record);
            }
            Err(e) => {
                // Header is line 1.
                warn!("skipping malformed CSV row {}: {}", i + 2, e);
            }
        }
    }
    Ok(records)
}

fn json_cell(value: serde_json::Value) -> RawValue {
    match value {
        serde_json::Value::Null => RawValue::Null,
        serde_json::Value::Number(n) => n.as_f64().map_or(RawValue::Null, RawValue::Number),
        serde_json::Value::String(s) => RawValue::Text(s),
        other => RawValue::Text(other.to_string()),
    }
}

fn records_from_json<R: Read>(rdr: R) -> Result<Vec<RawRecord>, serde_json::Error> {
    let rows: Vec<serde_json::Value> = serde_json::from_reader(rdr)?;
    let mut records = Vec::new();
    for (i, row) in rows.into_iter().enumerate() {
        match row {
            serde_json::Value::Object(map) => {
                records.push(map.into_iter().map(|(k, v)| (k, json_cell(v))).collect());
            }
            other => warn!("skipping JSON entry {}: expected an object, got {}", i, other),
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Convert records to players, logging and skipping failures.
pub fn convert_records(records: &[RawRecord], options: &ConversionOptions) -> Vec<Player> {
    let mut players = Vec::with_capacity(records.len());
    for record in records {
        match Player::from_record(record, options) {
            Ok(converted) => {
                for w in &converted.warnings {
                    warn!(
                        "'{}': ambiguous {} value {} read as {:?}",
                        converted.player.name, w.field, w.flag.raw, w.flag.assumed
                    );
                }
                players.push(converted.player);
            }
            Err(e) => warn!("skipping record: {}", e),
        }
    }
    players
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Read raw records from a CSV or JSON file.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>, IngestError> {
    let display = path.display().to_string();
    let format = FileFormat::from_path(path).ok_or_else(|| {
        IngestError::Validation(format!("{display}: expected a .csv or .json file"))
    })?;
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: display.clone(),
        source: e,
    })?;
    match format {
        FileFormat::Csv => records_from_csv(file).map_err(|e| IngestError::Csv {
            path: display,
            source: e,
        }),
        FileFormat::Json => records_from_json(file).map_err(|e| IngestError::Json {
            path: display,
            source: e,
        }),
    }
}

/// Load players from one file. A file yielding no players is an error.
pub fn load_player_file(path: &Path, options: &ConversionOptions) -> Result<Vec<Player>, IngestError> {
    let records = load_records(path)?;
    let players = convert_records(&records, options);
    if players.is_empty() {
        return Err(IngestError::Validation(format!(
            "{} produced zero valid players",
            path.display()
        )));
    }
    info!(
        "Loaded {} of {} records from {}",
        players.len(),
        records.len(),
        path.display()
    );
    Ok(players)
}

/// Load and concatenate players from every path, in order.
pub fn load_players<P: AsRef<Path>>(
    paths: &[P],
    options: &ConversionOptions,
) -> Result<Vec<Player>, IngestError> {
    let mut players = Vec::new();
    for path in paths {
        players.extend(load_player_file(path.as_ref(), options)?);
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
