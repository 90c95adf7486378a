// src/io/csv_table.rs
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use log::{debug, info};
use crate::error::{Error, Result};
use crate::types::{Attribute, Category, Unit, UnitTable, UNIT_COLUMN};

/// What a header refers to.
enum Column {
    Name,
    Category(Category),
    Numeric(Attribute),
    Other(String),
}

impl Column {
    fn classify(header: &str) -> Self {
        if header == UNIT_COLUMN {
            Column::Name
        } else if let Some(cat) = Category::from_column(header) {
            Column::Category(cat)
        } else if let Some(attr) = Attribute::from_column(header) {
            Column::Numeric(attr)
        } else {
            Column::Other(header.to_string())
        }
    }
}

fn parse_number(attr: Attribute, raw: &str, row: usize) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(attr.default_value());
    }
    raw.parse::<f64>().map_err(|_| Error::parse(format!(
        "row {}, column '{}': invalid number '{}'", row, attr.as_str(), raw
    )))
}

/// Reads a unit table with a header row. Rows keep their file order.
///
/// Headers and numeric cells are trimmed; names, categories and other text cells are kept
/// exactly as written.
pub fn read_unit_table<R: Read>(reader: R) -> Result<UnitTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let layout: Vec<Column> = headers.iter().map(|h| Column::classify(h)).collect();
    let mut table = UnitTable::new(headers);

    for (i, result) in csv_reader.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let mut unit = Unit::new("");
        for (column, raw) in layout.iter().zip(record.iter()) {
            match column {
                Column::Name => unit.name = raw.to_string(),
                Column::Category(cat) => unit.set_category(*cat, raw),
                Column::Numeric(attr) => unit.set(*attr, parse_number(*attr, raw, row)?),
                Column::Other(header) => {
                    unit.extra.insert(header.clone(), raw.to_string());
                },
            }
        }
        table.push(unit);
    }

    debug!("Read {} units with {} columns", table.len(), table.columns().len());
    Ok(table)
}

pub fn load_unit_table<P: AsRef<Path>>(path: P) -> Result<UnitTable> {
    let file = File::open(path.as_ref())?;
    let table = read_unit_table(BufReader::new(file))?;
    info!("Loaded {} units from {}", table.len(), path.as_ref().display());
    Ok(table)
}

/// Writes `table` with its own column order.
pub fn write_unit_table<W: Write>(table: &UnitTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    let layout: Vec<Column> = table.columns().iter().map(|h| Column::classify(h)).collect();
    csv_writer.write_record(table.columns())?;

    for unit in table.units() {
        let record: Vec<String> = layout
            .iter()
            .map(|column| match column {
                Column::Name => unit.name.clone(),
                Column::Category(cat) => unit.category(*cat).to_string(),
                Column::Numeric(attr) => unit.get(*attr).to_string(),
                Column::Other(header) => unit.extra.get(header).cloned().unwrap_or_default(),
            })
            .collect();
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes to a temporary sibling first and renames it over `path`, so a failed run never
/// leaves a partial table behind.
pub fn save_unit_table<P: AsRef<Path>>(table: &UnitTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");
    replace_via_temp(path, &temp_path, |file| write_unit_table(table, BufWriter::new(file)))?;
    info!("Saved {} units to {}", table.len(), path.display());
    Ok(())
}

/// Runs `write` against a fresh `temp_path` and renames it over `path`. The temporary file is
/// removed again if either step fails.
pub(crate) fn replace_via_temp<F>(path: &Path, temp_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    let result = File::create(temp_path)
        .map_err(Error::from)
        .and_then(write)
        .and_then(|_| std::fs::rename(temp_path, path).map_err(Error::from));
    if result.is_err() {
        let _ = std::fs::remove_file(temp_path);
    }
    result
}
