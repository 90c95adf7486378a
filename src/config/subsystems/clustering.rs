// src/config/subsystems/clustering.rs

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use crate::error::{Error, Result};
use crate::config::FromIni;

/// How units are merged. Names match the method strings used in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusteringMethod {
    Standard,
    Milp,
    LpClustered,
    Lp,
    IntegerClustering,
    NoClustering,
}

impl ClusteringMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusteringMethod::Standard => "Standard",
            ClusteringMethod::Milp => "MILP",
            ClusteringMethod::LpClustered => "LP clustered",
            ClusteringMethod::Lp => "LP",
            ClusteringMethod::IntegerClustering => "Integer clustering",
            ClusteringMethod::NoClustering => "No clustering",
        }
    }
}

impl FromStr for ClusteringMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_matches('"') {
            "Standard" => Ok(Self::Standard),
            "MILP" => Ok(Self::Milp),
            "LP clustered" => Ok(Self::LpClustered),
            "LP" => Ok(Self::Lp),
            "Integer clustering" => Ok(Self::IntegerClustering),
            "No clustering" => Ok(Self::NoClustering),
            other => Err(Error::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for ClusteringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ClusteringMethod {
    fn default() -> Self {
        Self::Standard
    }
}

/// Which rows the Integer clustering rounding step rescales.
///
/// `Legacy` reproduces the historical tool, whose rounding loop only kept the last row
/// index and so corrected the final merged row alone. `PerRow` corrects every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegerRounding {
    PerRow,
    Legacy,
}

impl IntegerRounding {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegerRounding::PerRow => "per_row",
            IntegerRounding::Legacy => "legacy",
        }
    }
}

impl FromStr for IntegerRounding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_matches('"').to_lowercase().as_str() {
            "per_row" | "per-row" => Ok(Self::PerRow),
            "legacy" => Ok(Self::Legacy),
            other => Err(Error::config(format!(
                "Invalid integer_rounding (expected per_row or legacy): {}", other
            ))),
        }
    }
}

impl Default for IntegerRounding {
    fn default() -> Self {
        Self::PerRow
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    pub method: ClusteringMethod,
    /// Number of breakpoints per fingerprint attribute
    pub nslices: usize,
    /// Units with a higher minimum part load only merge through the flexibility or size tests
    pub part_load_max: f64,
    /// Units at or below this capacity (MW) are always merge candidates
    pub pmax: f64,
    pub integer_rounding: IntegerRounding,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            method: ClusteringMethod::Standard,
            nslices: 20,
            part_load_max: 0.1,
            pmax: 30.0,
            integer_rounding: IntegerRounding::PerRow,
        }
    }
}

impl ClusteringConfig {
    pub fn with_method(method: ClusteringMethod) -> Self {
        Self { method, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.nslices == 0 {
            return Err(Error::Config(
                "nslices must be greater than 0".to_string()
            ));
        }
        if !self.part_load_max.is_finite() || self.part_load_max < 0.0 {
            return Err(Error::Config(
                format!("part_load_max must be a non-negative number: {}", self.part_load_max)
            ));
        }
        if !self.pmax.is_finite() || self.pmax < 0.0 {
            return Err(Error::Config(
                format!("pmax must be a non-negative number: {}", self.pmax)
            ));
        }
        Ok(())
    }
}

impl FromIni for ClusteringConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "clustering" {
            return None;
        }

        match key {
            "method" => Some(value.parse::<ClusteringMethod>().map(|method| self.method = method)),
            "nslices" => {
                match value.parse::<usize>() {
                    Ok(n) if n > 0 => {
                        self.nslices = n;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid nslices (must be a positive integer): {}", value)
                    ))),
                }
            },
            "part_load_max" => {
                match value.parse::<f64>() {
                    Ok(ratio) if (0.0..=1.0).contains(&ratio) => {
                        self.part_load_max = ratio;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid part_load_max (must be between 0 and 1): {}", value)
                    ))),
                }
            },
            "pmax" => {
                match value.parse::<f64>() {
                    Ok(p) if p >= 0.0 => {
                        self.pmax = p;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid pmax: {}", value)
                    ))),
                }
            },
            "integer_rounding" => Some(value.parse::<IntegerRounding>().map(|mode| self.integer_rounding = mode)),
            _ => None,
        }
    }
}
