// cluster/finalize.rs
use log::debug;
use crate::config::subsystems::{ClusteringConfig, ClusteringMethod, IntegerRounding};
use crate::types::{Attribute, Unit, UnitTable};
use super::diagnostics::{DiagnosticKind, Diagnostics};

/// Quantities rescaled when Integer clustering rounds a unit count.
const ROUNDING_RESCALED: [Attribute; 5] = [
    Attribute::PowerCapacity,
    Attribute::STOCapacity,
    Attribute::STOMaxChargingPower,
    Attribute::InitialPower,
    Attribute::NoLoadCost,
];

/// Method-specific fix-ups on the named, merged table.
pub struct PostProcessor {
    method: ClusteringMethod,
    rounding: IntegerRounding,
}

impl PostProcessor {
    pub fn new(config: &ClusteringConfig) -> Self {
        Self {
            method: config.method,
            rounding: config.integer_rounding,
        }
    }

    pub fn apply(&self, table: &mut UnitTable, diagnostics: &mut Diagnostics) {
        match self.method {
            ClusteringMethod::LpClustered => derive_ramping_costs(table, diagnostics),
            ClusteringMethod::IntegerClustering => self.round_unit_counts(table, diagnostics),
            _ => {},
        }
    }

    fn round_unit_counts(&self, table: &mut UnitTable, diagnostics: &mut Diagnostics) {
        let rescaled = table.present(&ROUNDING_RESCALED);
        let rows = match self.rounding {
            IntegerRounding::PerRow => 0..table.len(),
            IntegerRounding::Legacy => table.len().saturating_sub(1)..table.len(),
        };
        for unit in &mut table.units_mut()[rows] {
            if let Some((from, to)) = round_unit_count(unit, &rescaled) {
                diagnostics.info(DiagnosticKind::NunitsRounded { unit: unit.name.clone(), from, to });
            }
        }
    }
}

/// Rows whose ramping cost is still zero (never merged) get the start-up cost spread over
/// their capacity instead.
fn derive_ramping_costs(table: &mut UnitTable, diagnostics: &mut Diagnostics) {
    if table.ensure_column(Attribute::RampingCost.as_str()) {
        diagnostics.info(DiagnosticKind::RampingCostColumnAdded);
    }
    for unit in table.units_mut() {
        if unit.get(Attribute::RampingCost) == 0.0 {
            let ramping_cost = unit.get(Attribute::StartUpCost) / unit.get(Attribute::PowerCapacity);
            debug!("Derived ramping cost {} for {}", ramping_cost, unit.name);
            unit.set(Attribute::RampingCost, ramping_cost);
        }
    }
}

/// Rounds Nunits half-to-even and rescales `rescaled` by the rounding ratio. Returns the old
/// and new count when the count actually changed. Rows with no units are left alone.
pub fn round_unit_count(unit: &mut Unit, rescaled: &[Attribute]) -> Option<(f64, f64)> {
    let count = unit.get(Attribute::Nunits);
    if count == 0.0 || !count.is_finite() {
        return None;
    }
    let rounded = count.round_ties_even();
    let ratio = rounded / count;
    for attr in rescaled {
        unit.set(*attr, unit.get(*attr) * ratio);
    }
    unit.set(Attribute::Nunits, rounded);
    (rounded != count).then_some((count, rounded))
}
