// src/io/mapping.rs
use std::io::{BufWriter, Write};
use std::path::Path;
use log::info;
use crate::cluster::Mapping;
use crate::error::Result;
use super::csv_table::replace_via_temp;

pub fn write_mapping<W: Write>(mapping: &Mapping, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, mapping)?;
    Ok(())
}

/// Saves the mapping as JSON, going through a temporary file like the unit table.
pub fn save_mapping<P: AsRef<Path>>(mapping: &Mapping, path: P) -> Result<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");
    replace_via_temp(path, &temp_path, |file| {
        let mut writer = BufWriter::new(file);
        write_mapping(mapping, &mut writer)?;
        writer.flush()?;
        Ok(())
    })?;
    info!(
        "Saved mapping of {} original units onto {} merged units to {}",
        mapping.original_len(), mapping.merged_len(), path.display()
    );
    Ok(())
}
