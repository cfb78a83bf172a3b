use serde::Serialize;
use thiserror::Error;

/// One municipality row parsed from the input CSV.
#[derive(Debug, Clone, Serialize)]
pub struct Municipality {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    pub rate: f64,
}

/// RGB triple. Serializes as `[r, g, b]`, the shape the column layer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// CSS hex form, used by the legend markup.
    pub fn css(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// A municipality that survived the rate transform, with its derived
/// visual encoding attached. One of these becomes one extruded column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnRecord {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    pub rate: f64,
    pub height: f64,
    pub color: Rgb,
}

/// The input table verbatim: every column carried through unchanged,
/// used only for the raw-data panel on the rendered page.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Everything loaded from the CSV in one pass. Immutable after load;
/// passed by reference through the rest of the pipeline.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub raw: RawTable,
    pub records: Vec<Municipality>,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load dataset: {0}")]
    DataLoad(String),
    #[error("invalid rate value {0}: rates must be finite and non-negative")]
    InvalidRate(f64),
    #[error("no municipalities with a non-zero rate; nothing to render")]
    EmptyScene,
}
