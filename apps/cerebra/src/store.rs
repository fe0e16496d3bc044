//! Table Merger — append-or-create persistence for the CSV files.
//!
//! The dataset file is written only through here. Appends are whole-file
//! rewrites: load what exists, extend, write the union back. There is no
//! deduplication — submitting the same rows twice doubles the data.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::CerebraError;

/// One recorded journal entry: the day label and the raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryRecord {
    pub d: String,
    pub journal_entry: String,
}

impl JournalEntryRecord {
    /// The stored field value carries literal surrounding double quotes,
    /// matching the dataset's historical format.
    pub fn new(day: &str, entry: &str) -> Self {
        Self {
            d: day.to_string(),
            journal_entry: format!("\"{entry}\""),
        }
    }
}

/// Appends `new_rows` to the CSV at `path`, creating the file if it does not
/// exist. Existing rows keep their order; new rows follow them. A missing
/// file is the create case; any other read or write failure propagates.
pub fn append_records<T>(path: &Path, new_rows: &[T]) -> Result<(), CerebraError>
where
    T: Serialize + DeserializeOwned + Clone,
{
    let mut rows: Vec<T> = if path.exists() {
        let mut reader = csv::Reader::from_path(path)?;
        reader.deserialize().collect::<Result<_, _>>()?
    } else {
        Vec::new()
    };

    rows.extend(new_rows.iter().cloned());

    let mut writer = csv::Writer::from_path(path)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
