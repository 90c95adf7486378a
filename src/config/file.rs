// src/config/file.rs

use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use crate::error::Result;
use super::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mapping: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/units.csv"),
            output: PathBuf::from("data/units_clustered.csv"),
            mapping: PathBuf::from("data/units_mapping.json"),
        }
    }
}

impl FromIni for FileConfig {
    fn from_ini_section(&mut self, _section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        match key {
            "input" => {
                self.input = PathBuf::from(value.trim_matches('"'));
                Some(Ok(()))
            },
            "output" => {
                self.output = PathBuf::from(value.trim_matches('"'));
                Some(Ok(()))
            },
            "mapping" => {
                self.mapping = PathBuf::from(value.trim_matches('"'));
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(crate::error::Error::Config(
                format!("Input unit table does not exist: {:?}", self.input)
            ));
        }

        // Create output directories if they don't exist
        for path in [&self.output, &self.mapping] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
        }

        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
