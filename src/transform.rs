use crate::classify::classify;
use crate::types::{ColumnRecord, Municipality, PipelineError};
use tracing::info;

/// Exponent applied to the rate before rendering. TFR values cluster
/// between 1.0 and 2.0, so the 7th power exaggerates small differences
/// into visible column-height differences.
pub const HEIGHT_EXPONENT: i32 = 7;

/// Maps a rate to its display height. Fertility rates are non-negative
/// by definition; anything else in the data is a hard error rather than
/// a silently negative column.
pub fn derive_height(rate: f64) -> Result<f64, PipelineError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(PipelineError::InvalidRate(rate));
    }
    Ok(rate.powi(HEIGHT_EXPONENT))
}

/// Attaches height and color to each municipality and drops the rows
/// with no published rate. Row order is preserved; the surviving set is
/// exactly the records with a non-zero rate.
pub fn transform(records: &[Municipality]) -> Result<Vec<ColumnRecord>, PipelineError> {
    info!("Transforming {} records...", records.len());

    let mut columns = Vec::with_capacity(records.len());
    for m in records {
        let height = derive_height(m.rate)?;
        if height == 0.0 {
            continue;
        }
        columns.push(ColumnRecord {
            name: m.name.clone(),
            longitude: m.longitude,
            latitude: m.latitude,
            rate: m.rate,
            height,
            color: classify(m.rate),
        });
    }

    info!("{} records survive the zero-rate filter", columns.len());
    Ok(columns)
}
