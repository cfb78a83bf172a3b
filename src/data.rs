use crate::config::{AppConfig, InputConfig};
use crate::types::{Dataset, Municipality, PipelineError, RawTable};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use tracing::info;

/// Loads the municipality CSV once. The returned dataset is never
/// mutated afterwards; callers pass it by reference (or hand it to the
/// server as shared read-only state).
pub fn load_dataset(config: &AppConfig) -> Result<Dataset> {
    info!("Loading data from {:?}...", config.input.data_csv);

    let file = File::open(&config.input.data_csv).map_err(|e| {
        PipelineError::DataLoad(format!(
            "cannot open {:?}: {}",
            config.input.data_csv, e
        ))
    })?;

    let dataset = read_dataset(file, &config.input)
        .with_context(|| format!("while reading {:?}", config.input.data_csv))?;

    info!("Loaded {} municipalities", dataset.records.len());
    Ok(dataset)
}

/// Parses the table from any reader. Required columns are located by
/// header name; all columns, incidental ones included, are kept verbatim
/// in the raw table for the data panel.
pub fn read_dataset<R: Read>(reader: R, input: &InputConfig) -> Result<Dataset, PipelineError> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| PipelineError::DataLoad(format!("cannot read CSV header: {}", e)))?
        .clone();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::DataLoad(format!("required column '{}' not found", name)))
    };

    let name_idx = find(&input.columns.name)?;
    let lon_idx = find(&input.columns.longitude)?;
    let lat_idx = find(&input.columns.latitude)?;
    let rate_idx = find(&input.columns.rate)?;

    let mut rows = Vec::new();
    let mut records = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record =
            result.map_err(|e| PipelineError::DataLoad(format!("malformed CSV row: {}", e)))?;

        // Every row goes into the raw table verbatim; only rows with a
        // name become pipeline records.
        rows.push(record.iter().map(|s| s.to_string()).collect());

        let name = record.get(name_idx).unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }

        let longitude = parse_coord(&record, lon_idx, &input.columns.longitude, line)?;
        let latitude = parse_coord(&record, lat_idx, &input.columns.latitude, line)?;
        let rate = parse_rate(&record, rate_idx, line)?;

        records.push(Municipality {
            name,
            longitude,
            latitude,
            rate,
        });
    }

    Ok(Dataset {
        raw: RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows,
        },
        records,
    })
}

fn parse_coord(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> Result<f64, PipelineError> {
    let raw = record.get(idx).unwrap_or("");
    raw.trim().parse().map_err(|_| {
        PipelineError::DataLoad(format!(
            "row {}: column '{}' has non-numeric value '{}'",
            line + 1,
            column,
            raw
        ))
    })
}

/// A blank rate cell marks a municipality with no published figure; it
/// parses as 0.0 so the transform drops the row from rendering.
fn parse_rate(
    record: &csv::StringRecord,
    idx: usize,
    line: usize,
) -> Result<f64, PipelineError> {
    let raw = record.get(idx).unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse().map_err(|_| {
        PipelineError::DataLoad(format!(
            "row {}: rate column has non-numeric value '{}'",
            line + 1,
            raw
        ))
    })
}
