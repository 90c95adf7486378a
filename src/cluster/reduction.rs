// cluster/reduction.rs
//! How each attribute of a cluster representative absorbs an incoming unit.

use crate::config::subsystems::ClusteringMethod;
use crate::types::{Attribute, Unit, UnitTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Representative's value is kept.
    Keep,
    /// Average weighted by PowerCapacity.
    CapacityWeighted,
    Sum,
    /// `min(old·P_old, new·P_add) / (P_old + P_add)`
    MinBlend,
    Zero,
    /// Start-up cost of the incoming unit folded into a per-MW ramping cost.
    RampingCost,
    ResetToOne,
    /// Average weighted by Nunits.
    CountWeighted,
    /// Nunits of both sides added.
    CountSum,
}

/// Rule applied to `attr` when two units merge under `method`.
pub fn reduction_for(method: ClusteringMethod, attr: Attribute) -> Reduction {
    use Attribute::*;
    use ClusteringMethod::*;

    match method {
        Standard | Milp | LpClustered => match attr {
            RampUpRate | RampDownRate | MinUpTime | MinDownTime | NoLoadCost | Efficiency
            | MinEfficiency | STOChargingEfficiency | CO2Intensity | STOSelfDischarge => {
                Reduction::CapacityWeighted
            },
            CHPPowerToHeat | CHPPowerLossFactor if method != LpClustered => {
                Reduction::CapacityWeighted
            },
            PowerCapacity | STOCapacity | STOMaxChargingPower | InitialPower => Reduction::Sum,
            PartLoadMin | StartUpTime if method == LpClustered => Reduction::Zero,
            PartLoadMin | StartUpTime => Reduction::MinBlend,
            RampingCost => Reduction::RampingCost,
            Nunits => Reduction::ResetToOne,
            _ => Reduction::Keep,
        },
        IntegerClustering => match attr {
            PowerCapacity | RampUpRate | RampDownRate | MinUpTime | MinDownTime | NoLoadCost
            | Efficiency | MinEfficiency | STOChargingEfficiency | CO2Intensity
            | STOSelfDischarge | STOCapacity | STOMaxChargingPower | InitialPower
            | PartLoadMin | StartUpTime | RampingCost => Reduction::CountWeighted,
            Nunits => Reduction::CountSum,
            _ => Reduction::Keep,
        },
        Lp | NoClustering => Reduction::Keep,
    }
}

/// The non-trivial rules for one table schema.
#[derive(Debug, Clone)]
pub struct MergeRules {
    rules: Vec<(Attribute, Reduction)>,
}

impl MergeRules {
    /// Only attributes that are columns of `table` take part in a merge.
    pub fn for_table(method: ClusteringMethod, table: &UnitTable) -> Self {
        let rules = Attribute::ALL
            .iter()
            .filter(|attr| table.has_attribute(**attr))
            .map(|attr| (*attr, reduction_for(method, *attr)))
            .filter(|(_, rule)| *rule != Reduction::Keep)
            .collect();
        Self { rules }
    }

    pub fn rule(&self, attr: Attribute) -> Reduction {
        self.rules
            .iter()
            .find(|(a, _)| *a == attr)
            .map(|(_, rule)| *rule)
            .unwrap_or(Reduction::Keep)
    }

    /// Folds `incoming` into `representative`. Every rule reads the representative's values
    /// from before the merge.
    pub fn apply(&self, representative: &mut Unit, incoming: &Unit) {
        let before = representative.clone();
        let p_old = before.get(Attribute::PowerCapacity);
        let p_add = incoming.get(Attribute::PowerCapacity);
        let n_old = before.get(Attribute::Nunits);
        let n_add = incoming.get(Attribute::Nunits);

        for (attr, rule) in &self.rules {
            let old = before.get(*attr);
            let new = incoming.get(*attr);
            let merged = match rule {
                Reduction::Keep => old,
                Reduction::CapacityWeighted => (old * p_old + new * p_add) / (p_old + p_add),
                Reduction::Sum => old + new,
                Reduction::MinBlend => (old * p_old).min(new * p_add) / (p_old + p_add),
                Reduction::Zero => 0.0,
                Reduction::RampingCost => {
                    let cost_to_full_load = p_add
                        * (1.0 - incoming.get(Attribute::PartLoadMin))
                        * new
                        + incoming.get(Attribute::StartUpCost);
                    (p_old * old + cost_to_full_load) / (p_old + p_add)
                },
                Reduction::ResetToOne => 1.0,
                Reduction::CountWeighted => (old * n_old + new * n_add) / (n_old + n_add),
                Reduction::CountSum => n_old + n_add,
            };
            representative.set(*attr, merged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table() -> UnitTable {
        UnitTable::with_attributes(&Attribute::ALL)
    }

    fn unit(capacity: f64) -> Unit {
        Unit::new("u")
            .with(Attribute::PowerCapacity, capacity)
            .with(Attribute::PartLoadMin, 0.4)
            .with(Attribute::StartUpTime, 2.0)
            .with(Attribute::NoLoadCost, 5.0)
            .with(Attribute::StartUpCost, 100.0)
            .with(Attribute::RampingCost, 1.0)
            .with(Attribute::CHPPowerToHeat, 1.0)
    }

    #[test]
    fn rule_table_differs_by_method() {
        use ClusteringMethod::*;
        assert_eq!(reduction_for(Standard, Attribute::CHPPowerToHeat), Reduction::CapacityWeighted);
        assert_eq!(reduction_for(LpClustered, Attribute::CHPPowerToHeat), Reduction::Keep);
        assert_eq!(reduction_for(Milp, Attribute::PartLoadMin), Reduction::MinBlend);
        assert_eq!(reduction_for(LpClustered, Attribute::StartUpTime), Reduction::Zero);
        assert_eq!(reduction_for(IntegerClustering, Attribute::PowerCapacity), Reduction::CountWeighted);
        assert_eq!(reduction_for(IntegerClustering, Attribute::Nunits), Reduction::CountSum);
        assert_eq!(reduction_for(Standard, Attribute::StartUpCost), Reduction::Keep);
        assert_eq!(reduction_for(NoClustering, Attribute::PowerCapacity), Reduction::Keep);
    }

    #[test]
    fn standard_merge_weights_by_capacity() {
        let rules = MergeRules::for_table(ClusteringMethod::Standard, &full_table());
        let mut rep = unit(10.0);
        let incoming = unit(20.0).with(Attribute::NoLoadCost, 7.0);
        rules.apply(&mut rep, &incoming);

        assert_eq!(rep.get(Attribute::PowerCapacity), 30.0);
        assert!((rep.get(Attribute::NoLoadCost) - 190.0 / 30.0).abs() < 1e-12);
        // min(0.4·10, 0.4·20) / 30
        assert!((rep.get(Attribute::PartLoadMin) - 4.0 / 30.0).abs() < 1e-12);
        assert!((rep.get(Attribute::StartUpTime) - 20.0 / 30.0).abs() < 1e-12);
        // (10·1 + 20·0.6·1 + 100) / 30
        assert!((rep.get(Attribute::RampingCost) - 122.0 / 30.0).abs() < 1e-12);
        assert_eq!(rep.get(Attribute::StartUpCost), 100.0);
        assert_eq!(rep.get(Attribute::Nunits), 1.0);
    }

    #[test]
    fn lp_clustered_zeroes_part_load_and_start_up_time() {
        let rules = MergeRules::for_table(ClusteringMethod::LpClustered, &full_table());
        let mut rep = unit(10.0);
        rules.apply(&mut rep, &unit(20.0).with(Attribute::CHPPowerToHeat, 3.0));
        assert_eq!(rep.get(Attribute::PartLoadMin), 0.0);
        assert_eq!(rep.get(Attribute::StartUpTime), 0.0);
        assert_eq!(rep.get(Attribute::CHPPowerToHeat), 1.0);
    }

    #[test]
    fn integer_merge_weights_by_unit_count() {
        let rules = MergeRules::for_table(ClusteringMethod::IntegerClustering, &full_table());
        let mut rep = unit(100.0).with(Attribute::Nunits, 1.0);
        let incoming = unit(200.0).with(Attribute::Nunits, 3.0);
        rules.apply(&mut rep, &incoming);
        assert_eq!(rep.get(Attribute::Nunits), 4.0);
        assert_eq!(rep.get(Attribute::PowerCapacity), 175.0);
        assert_eq!(rep.get(Attribute::PartLoadMin), 0.4);
    }

    #[test]
    fn absent_columns_are_left_alone() {
        let table = UnitTable::with_attributes(&Attribute::REQUIRED);
        let rules = MergeRules::for_table(ClusteringMethod::Standard, &table);
        assert_eq!(rules.rule(Attribute::RampingCost), Reduction::Keep);
        let mut rep = unit(10.0);
        rules.apply(&mut rep, &unit(20.0).with(Attribute::RampingCost, 9.0));
        assert_eq!(rep.get(Attribute::RampingCost), 1.0);
    }
}
