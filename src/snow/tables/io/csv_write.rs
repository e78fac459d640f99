use std::path::Path;

use crate::snow::tables::error::Result;
use crate::snow::tables::model::TableFrame;

/// Writes the frame as a headed CSV file, replacing any existing file.
pub fn write_csv(path: &Path, frame: &TableFrame) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&frame.columns)?;
    for row in &frame.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
