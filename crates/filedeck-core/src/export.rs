/// Export a listing snapshot as JSON or CSV.
use crate::model::DirectoryEntry;
use std::io::Write;

/// Errors raised while serialising a listing.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `entries` as a pretty-printed JSON array.
pub fn write_json<W: Write>(entries: &[DirectoryEntry], mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writeln!(writer)?;
    Ok(())
}

/// Write `entries` as CSV with a `name,full_path,kind` header.
pub fn write_csv<W: Write>(entries: &[DirectoryEntry], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in entries {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(())
}
