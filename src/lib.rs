//! plantmerge reduces a power plant table for dispatch models by merging units that are
//! similar enough to be modelled as one, keeping a mapping back to the original rows.

// Module declarations
pub mod error;
pub mod types;
pub mod config;
pub mod cluster;
pub mod io;
pub mod utils;

// Re-exports
pub use error::{Error, Result};
pub use types::{Attribute, Category, Unit, UnitTable};
pub use cluster::{cluster_units, ClusteringEngine, ClusteringOutcome, Mapping};

// Re-export the config from config module
pub use config::PlantMergeConfig;
pub use config::subsystems::{ClusteringConfig, ClusteringMethod, IntegerRounding};
