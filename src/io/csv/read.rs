//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{Column, CsvReadOptions, CsvReader, DataType}};
use tracing::{debug, warn};

use crate::{attr::{Attribute, Record}, common};

/// Column holding the region key.
const NAME_COLUMN: &str = "name";

/// All columns are read as text; numeric parsing happens per cell.
fn text_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Reads attribute records from the CSV file at `path`.
pub(crate) fn read_records(path: &Path) -> Result<Vec<Record>> {
    common::require_file_exists(path)?;
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    let df = text_options()
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))?;
    records_from_frame(&df)
}

/// Reads attribute records from CSV text.
pub(crate) fn read_records_str(csv: &str) -> Result<Vec<Record>> {
    let df = CsvReader::new(Cursor::new(csv.as_bytes()))
        .with_options(text_options())
        .finish()
        .context("[io::csv::read] Failed to read CSV from string")?;
    records_from_frame(&df)
}

/// Convert a text DataFrame into records, one per row with a non-null name.
fn records_from_frame(df: &DataFrame) -> Result<Vec<Record>> {
    let names = df.column(NAME_COLUMN)
        .with_context(|| format!("[io::csv::read] CSV has no {NAME_COLUMN:?} column"))?
        .cast(&DataType::String)?;

    let mut columns: Vec<(Attribute, Column)> = Vec::with_capacity(Attribute::COUNT);
    for attr in Attribute::ALL {
        match df.column(attr.name()) {
            Ok(column) => columns.push((attr, column.cast(&DataType::String)?)),
            Err(_) => warn!(column = attr.name(), "attribute column missing; values treated as invalid"),
        }
    }

    let text = columns.iter()
        .map(|(attr, column)| Ok((*attr, column.str()?)))
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(df.height());
    for (row, name) in names.str()?.into_iter().enumerate() {
        let Some(name) = name else {
            warn!(row, "skipping CSV row without a name");
            continue
        };

        let cells = text.iter()
            .filter_map(|(attr, cells)| cells.get(row).map(|cell| (attr.name(), cell)));
        records.push(Record::from_text(name, cells));
    }

    debug!(rows = df.height(), records = records.len(), "CSV records read");
    Ok(records)
}
