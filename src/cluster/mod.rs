// cluster/mod.rs
pub mod diagnostics;
pub mod engine;
pub mod finalize;
pub mod fingerprint;
pub mod naming;
pub mod reduction;

// Re-export the main entry points
pub use self::engine::{cluster_units, ClusteringEngine, ClusteringOutcome};
pub use self::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use self::fingerprint::{Fingerprint, FingerprintEncoder};
pub use self::naming::{Mapping, NameResolver};
pub use self::finalize::PostProcessor;
