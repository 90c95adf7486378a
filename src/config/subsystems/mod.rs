pub mod clustering;
pub mod logging;

pub use clustering::{ClusteringConfig, ClusteringMethod, IntegerRounding};
pub use logging::LoggingConfig;
