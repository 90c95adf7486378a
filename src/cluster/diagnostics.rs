// cluster/diagnostics.rs
use std::fmt;
use serde::Serialize;
use log::{info, warn};
use crate::config::subsystems::ClusteringMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

/// Something worth reporting about a clustering run that did not stop it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DiagnosticKind {
    /// The table had no Unit column; merged units are named from their row indices.
    UnitColumnAdded,
    /// The table had no Nunits column; every row was treated as a single unit.
    NunitsColumnAdded,
    /// Standard/MILP merging needs Nunits == 1 everywhere; nothing was merged.
    NunitsNotUnitary { method: ClusteringMethod, rows: usize },
    /// LP clustered folded multi-unit rows into single rows before merging.
    NunitsExpanded { rows: usize },
    /// LP clustered derived ramping costs for a table that had no RampingCost column.
    RampingCostColumnAdded,
    /// Integer clustering rounded a fractional unit count.
    NunitsRounded { unit: String, from: f64, to: f64 },
    Reduced { original: usize, merged: usize },
    NoReduction { units: usize },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnitColumnAdded => {
                write!(f, "No Unit column found, naming merged units from their row indices")
            },
            DiagnosticKind::NunitsColumnAdded => {
                write!(f, "No Nunits column found, assuming one unit per row")
            },
            DiagnosticKind::NunitsNotUnitary { method, rows } => write!(
                f,
                "The {} clustering method is only applicable if all values of the Nunits column \
                 are set to one ({} rows differ). No clustering will be applied",
                method, rows
            ),
            DiagnosticKind::NunitsExpanded { rows } => write!(
                f,
                "The LP clustering method aggregates all the units of the same type. \
                 Individual units are not considered ({} multi-unit rows expanded)",
                rows
            ),
            DiagnosticKind::RampingCostColumnAdded => {
                write!(f, "No RampingCost column found, deriving it from the start-up costs")
            },
            DiagnosticKind::NunitsRounded { unit, from, to } => {
                write!(f, "Rounded Nunits of {} from {} to {}", unit, from, to)
            },
            DiagnosticKind::Reduced { original, merged } => {
                write!(f, "Clustered {} original units into {} new units", original, merged)
            },
            DiagnosticKind::NoReduction { .. } => write!(f, "Did not cluster any unit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Status records collected during one run, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn info(&mut self, kind: DiagnosticKind) {
        self.entries.push(Diagnostic { severity: Severity::Info, kind });
    }

    pub fn warning(&mut self, kind: DiagnosticKind) {
        self.entries.push(Diagnostic { severity: Severity::Warning, kind });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Warning)
    }

    pub fn contains(&self, predicate: impl Fn(&DiagnosticKind) -> bool) -> bool {
        self.entries.iter().any(|d| predicate(&d.kind))
    }

    /// Forwards every record to the `log` facade.
    pub fn emit(&self) {
        for diagnostic in &self.entries {
            match diagnostic.severity {
                Severity::Info => info!("{}", diagnostic),
                Severity::Warning => warn!("{}", diagnostic),
            }
        }
    }
}
