use crate::cleaner::{clean, CleanReport};
use crate::error::{Error, Result};
use crate::types::{CleanRecord, RawRecord};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Deserialize every row of a delivery CSV. A missing column or a short row is
/// an error for the whole load.
pub fn read_raw<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::None).from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawRecord>() {
        rows.push(result?);
    }
    Ok(rows)
}

pub fn load_raw(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path)?;
    let rows = read_raw(file)?;
    info!(path = %path.display(), rows = rows.len(), "Read delivery CSV");
    Ok(rows)
}

pub fn load_and_clean(path: &Path) -> Result<(Vec<CleanRecord>, CleanReport)> {
    clean(load_raw(path)?)
}
