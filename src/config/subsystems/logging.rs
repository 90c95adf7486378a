// src/config/subsystems/logging.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use log::LevelFilter;
use crate::error::{Error, Result};
use crate::config::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// error, warn, info, debug, trace or none
    pub level: String,
    /// When set, log lines go to a timestamped file in this directory instead of stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn get_log_level(&self) -> LevelFilter {
        match self.level.trim().to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "none" => LevelFilter::Off,
            _ => LevelFilter::Info, // Default to Info if invalid
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.log_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl FromIni for LoggingConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "logging" {
            return None;
        }
        match key {
            "level" => {
                let level = value.trim_matches('"').to_string();
                match level.to_lowercase().as_str() {
                    "error" | "warn" | "info" | "debug" | "trace" | "none" => {
                        self.level = level;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(format!("Invalid log level: {}", value)))),
                }
            },
            "log_dir" => {
                let dir = value.trim_matches('"');
                self.log_dir = if dir.is_empty() { None } else { Some(PathBuf::from(dir)) };
                Some(Ok(()))
            },
            _ => None,
        }
    }
}
