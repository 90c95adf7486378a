// cluster/engine.rs
use log::{debug, trace};
use crate::config::subsystems::{ClusteringConfig, ClusteringMethod};
use crate::error::{Error, Result};
use crate::types::{Attribute, Unit, UnitTable, UNIT_COLUMN};
use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::finalize::PostProcessor;
use super::fingerprint::{Fingerprint, FingerprintEncoder};
use super::naming::{Mapping, NameResolver};
use super::reduction::MergeRules;

/// Ramp rates above this (per minute, as a share of capacity) count as fast.
const FLEXIBLE_RAMP_RATE: f64 = 1.0 / 60.0;

/// A merged unit under construction.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Starts as a copy of the first member and absorbs the others.
    pub representative: Unit,
    /// Fingerprint of the first member; later merges do not update it.
    pub fingerprint: Fingerprint,
    /// Original row indices, in the order they joined.
    pub members: Vec<usize>,
}

/// Accumulates clusters in creation order without touching the input table.
#[derive(Debug)]
pub struct ClusterBuilder {
    rules: MergeRules,
    clusters: Vec<Cluster>,
}

impl ClusterBuilder {
    pub fn new(rules: MergeRules) -> Self {
        Self { rules, clusters: Vec::new() }
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn open(&mut self, index: usize, unit: &Unit, fingerprint: Fingerprint) {
        self.clusters.push(Cluster {
            representative: unit.clone(),
            fingerprint,
            members: vec![index],
        });
    }

    pub fn absorb(&mut self, cluster: usize, index: usize, unit: &Unit) {
        let target = &mut self.clusters[cluster];
        self.rules.apply(&mut target.representative, unit);
        target.members.push(index);
    }

    pub fn finish(self) -> Vec<Cluster> {
        self.clusters
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergePolicy {
    /// Every unit stays on its own.
    Never,
    /// Same type and similar enough (fingerprint, flexibility or size).
    Similar,
    /// Same type only.
    SameType,
}

/// Result of one clustering run.
#[derive(Debug, Clone)]
pub struct ClusteringOutcome {
    pub table: UnitTable,
    pub mapping: Mapping,
    pub diagnostics: Diagnostics,
}

impl ClusteringOutcome {
    pub fn reduced(&self) -> bool {
        self.mapping.merged_len() < self.mapping.original_len()
    }
}

/// Fast ramping and short start-up and minimum up/down times.
pub fn is_highly_flexible(unit: &Unit) -> bool {
    unit.get(Attribute::RampUpRate) > FLEXIBLE_RAMP_RATE
        && unit.get(Attribute::RampDownRate) > FLEXIBLE_RAMP_RATE
        && unit.get(Attribute::StartUpTime) < 1.0
        && unit.get(Attribute::MinDownTime) <= 1.0
        && unit.get(Attribute::MinUpTime) <= 1.0
}

pub fn check_required_columns(table: &UnitTable) -> Result<()> {
    match Attribute::REQUIRED.iter().find(|attr| !table.has_attribute(**attr)) {
        Some(missing) => Err(Error::missing_column(missing.as_str())),
        None => Ok(()),
    }
}

pub struct ClusteringEngine {
    config: ClusteringConfig,
    encoder: FingerprintEncoder,
}

impl ClusteringEngine {
    pub fn new(config: &ClusteringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            encoder: FingerprintEncoder::new(config.nslices)?,
        })
    }

    /// Clusters `input` with the configured method. `input` is left untouched.
    pub fn run(&self, input: &UnitTable) -> Result<ClusteringOutcome> {
        let mut diagnostics = Diagnostics::default();
        let (working, policy) = self.prepare(input, &mut diagnostics)?;
        debug!(
            "Clustering {} units with method '{}' ({:?})",
            working.len(), self.config.method, policy
        );

        let fingerprints = self.encoder.encode_all(working.units());
        let mut builder = ClusterBuilder::new(MergeRules::for_table(self.config.method, &working));

        for (index, (unit, fingerprint)) in working.units().iter().zip(&fingerprints).enumerate() {
            let target = match policy {
                MergePolicy::Never => None,
                _ => builder
                    .clusters()
                    .iter()
                    .position(|cluster| self.is_eligible(policy, unit, fingerprint, cluster)),
            };
            match target {
                Some(cluster) => {
                    trace!("Unit {} ({}) joins cluster {}", index, unit.name, cluster);
                    builder.absorb(cluster, index, unit);
                },
                None => builder.open(index, unit, *fingerprint),
            }
        }

        let columns = working.columns().to_vec();
        let (mut table, mapping) =
            NameResolver::resolve(columns, builder.finish(), working.len(), &mut diagnostics);
        PostProcessor::new(&self.config).apply(&mut table, &mut diagnostics);

        Ok(ClusteringOutcome { table, mapping, diagnostics })
    }

    /// Validates the schema and builds the working copy the scan runs over.
    fn prepare(&self, input: &UnitTable, diagnostics: &mut Diagnostics) -> Result<(UnitTable, MergePolicy)> {
        check_required_columns(input)?;
        let mut working = input.clone();

        if working.ensure_leading_column(UNIT_COLUMN) {
            diagnostics.info(DiagnosticKind::UnitColumnAdded);
        }

        if working.ensure_column(Attribute::Nunits.as_str()) {
            for unit in working.units_mut() {
                unit.set(Attribute::Nunits, 1.0);
            }
            diagnostics.info(DiagnosticKind::NunitsColumnAdded);
        }

        let multi_unit_rows = working
            .units()
            .iter()
            .filter(|u| u.get(Attribute::Nunits) != 1.0)
            .count();

        let policy = match self.config.method {
            method @ (ClusteringMethod::Standard | ClusteringMethod::Milp) => {
                if multi_unit_rows > 0 {
                    diagnostics.warning(DiagnosticKind::NunitsNotUnitary { method, rows: multi_unit_rows });
                    MergePolicy::Never
                } else {
                    MergePolicy::Similar
                }
            },
            ClusteringMethod::LpClustered => {
                if multi_unit_rows > 0 {
                    diagnostics.warning(DiagnosticKind::NunitsExpanded { rows: multi_unit_rows });
                    let capacity_like = working.present(&Attribute::CAPACITY_LIKE);
                    for unit in working.units_mut() {
                        let count = unit.get(Attribute::Nunits);
                        for attr in &capacity_like {
                            unit.set(*attr, unit.get(*attr) * count);
                        }
                        unit.set(Attribute::Nunits, 1.0);
                    }
                }
                MergePolicy::Similar
            },
            ClusteringMethod::IntegerClustering => MergePolicy::SameType,
            ClusteringMethod::Lp | ClusteringMethod::NoClustering => MergePolicy::Never,
        };

        Ok((working, policy))
    }

    fn is_eligible(&self, policy: MergePolicy, unit: &Unit, fingerprint: &Fingerprint, cluster: &Cluster) -> bool {
        if !unit.same_type(&cluster.representative) {
            return false;
        }
        match policy {
            MergePolicy::Never => false,
            MergePolicy::SameType => true,
            MergePolicy::Similar => {
                let same_fingerprint = *fingerprint == cluster.fingerprint;
                let low_pmin = unit.get(Attribute::PartLoadMin) <= self.config.part_load_max;
                let low_pmax = unit.get(Attribute::PowerCapacity) <= self.config.pmax;
                (same_fingerprint && low_pmin) || is_highly_flexible(unit) || low_pmax
            },
        }
    }
}

/// Runs one clustering pass over `input` with `config`.
pub fn cluster_units(input: &UnitTable, config: &ClusteringConfig) -> Result<ClusteringOutcome> {
    ClusteringEngine::new(config)?.run(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn table(units: Vec<Unit>) -> UnitTable {
        let mut attrs = Attribute::REQUIRED.to_vec();
        attrs.push(Attribute::RampingCost);
        attrs.push(Attribute::Nunits);
        UnitTable::from_units(UnitTable::with_attributes(&attrs).columns().to_vec(), units)
    }

    /// Slow, large, high minimum load: only the fingerprint path can merge it.
    fn baseload(name: &str, capacity: f64) -> Unit {
        Unit::new(name)
            .with_category(Category::Zone, "FR")
            .with_category(Category::Technology, "STUR")
            .with_category(Category::Fuel, "NUC")
            .with(Attribute::PowerCapacity, capacity)
            .with(Attribute::PartLoadMin, 0.5)
            .with(Attribute::RampUpRate, 0.01)
            .with(Attribute::RampDownRate, 0.01)
            .with(Attribute::StartUpTime, 24.0)
            .with(Attribute::MinUpTime, 72.0)
            .with(Attribute::MinDownTime, 72.0)
            .with(Attribute::Efficiency, 0.33)
    }

    fn config(method: ClusteringMethod) -> ClusteringConfig {
        ClusteringConfig::with_method(method)
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let columns: Vec<String> = ["Unit", "PowerCapacity", "PartLoadMin"]
            .iter().map(|s| s.to_string()).collect();
        let input = UnitTable::from_units(columns, vec![Unit::new("a")]);
        let err = cluster_units(&input, &config(ClusteringMethod::Standard)).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(c) if c == "RampUpRate"));
    }

    #[test]
    fn flexibility_test_uses_strict_and_inclusive_bounds() {
        let unit = Unit::new("gt")
            .with(Attribute::RampUpRate, 0.1)
            .with(Attribute::RampDownRate, 0.1)
            .with(Attribute::StartUpTime, 0.5)
            .with(Attribute::MinUpTime, 1.0)
            .with(Attribute::MinDownTime, 1.0);
        assert!(is_highly_flexible(&unit));
        assert!(!is_highly_flexible(&unit.clone().with(Attribute::StartUpTime, 1.0)));
        assert!(!is_highly_flexible(&unit.with(Attribute::RampUpRate, 1.0 / 60.0)));
    }

    #[test]
    fn large_inflexible_units_need_matching_fingerprint_and_low_part_load() {
        // PartLoadMin 0.5 > 0.1 and 900 MW > 30 MW: nothing makes them eligible.
        let input = table(vec![baseload("a", 900.0), baseload("b", 900.0)]);
        let outcome = cluster_units(&input, &config(ClusteringMethod::Standard)).unwrap();
        assert_eq!(outcome.table.len(), 2);
        assert!(!outcome.reduced());

        // Same fingerprint and low part load: merged.
        let input = table(vec![
            baseload("a", 900.0).with(Attribute::PartLoadMin, 0.05),
            baseload("b", 900.0).with(Attribute::PartLoadMin, 0.05),
        ]);
        let outcome = cluster_units(&input, &config(ClusteringMethod::Standard)).unwrap();
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.table.units()[0].get(Attribute::PowerCapacity), 1800.0);
    }

    #[test]
    fn different_types_never_merge() {
        let input = table(vec![
            baseload("a", 10.0),
            baseload("b", 10.0).with_category(Category::Zone, "DE"),
        ]);
        let outcome = cluster_units(&input, &config(ClusteringMethod::Standard)).unwrap();
        assert_eq!(outcome.table.len(), 2);
    }

    #[test]
    fn first_eligible_cluster_wins() {
        // "c" is small, so it could join either cluster; it joins the first one created.
        let input = table(vec![
            baseload("a", 900.0),
            baseload("b", 900.0).with(Attribute::Efficiency, 0.9),
            baseload("c", 20.0),
        ]);
        let outcome = cluster_units(&input, &config(ClusteringMethod::Standard)).unwrap();
        let groups: Vec<_> = outcome.mapping.clusters().map(|(_, m)| m.to_vec()).collect();
        assert_eq!(groups, vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn standard_refuses_multi_unit_rows() {
        let input = table(vec![
            baseload("a", 10.0).with(Attribute::Nunits, 2.0),
            baseload("b", 10.0),
        ]);
        let outcome = cluster_units(&input, &config(ClusteringMethod::Milp)).unwrap();
        assert_eq!(outcome.table.len(), 2);
        assert!(outcome.diagnostics.has_warnings());
        assert!(outcome.diagnostics.contains(|k| matches!(
            k,
            DiagnosticKind::NunitsNotUnitary { method: ClusteringMethod::Milp, rows: 1 }
        )));
        assert_eq!(outcome.table.units()[0].get(Attribute::Nunits), 2.0);
    }

    #[test]
    fn lp_clustered_expands_multi_unit_rows_in_the_working_copy() {
        let input = table(vec![baseload("a", 10.0).with(Attribute::Nunits, 3.0)]);
        let outcome = cluster_units(&input, &config(ClusteringMethod::LpClustered)).unwrap();
        let merged = &outcome.table.units()[0];
        assert_eq!(merged.get(Attribute::PowerCapacity), 30.0);
        assert_eq!(merged.get(Attribute::Nunits), 1.0);
        assert!(outcome.diagnostics.contains(|k| matches!(k, DiagnosticKind::NunitsExpanded { rows: 1 })));
        // The caller's table is unchanged.
        assert_eq!(input.units()[0].get(Attribute::PowerCapacity), 10.0);
        assert_eq!(input.units()[0].get(Attribute::Nunits), 3.0);
    }

    #[test]
    fn integer_clustering_ignores_similarity() {
        let input = table(vec![
            baseload("a", 900.0).with(Attribute::Nunits, 2.0),
            baseload("b", 300.0).with(Attribute::Efficiency, 0.9),
        ]);
        let outcome = cluster_units(&input, &config(ClusteringMethod::IntegerClustering)).unwrap();
        assert_eq!(outcome.table.len(), 1);
        let merged = &outcome.table.units()[0];
        assert_eq!(merged.get(Attribute::Nunits), 3.0);
        assert_eq!(merged.get(Attribute::PowerCapacity), 700.0);
    }

    #[test]
    fn passthrough_methods_keep_every_row() {
        for method in [ClusteringMethod::Lp, ClusteringMethod::NoClustering] {
            let input = table(vec![baseload("a", 5.0), baseload("b", 5.0)]);
            let outcome = cluster_units(&input, &config(method)).unwrap();
            assert_eq!(outcome.table.len(), 2);
            assert_eq!(outcome.table.units()[1].name, "[1] - b");
        }
    }

    #[test]
    fn missing_nunits_column_is_added() {
        let columns = UnitTable::with_attributes(&Attribute::REQUIRED).columns().to_vec();
        let input = UnitTable::from_units(columns, vec![baseload("a", 5.0)]);
        let outcome = cluster_units(&input, &config(ClusteringMethod::Standard)).unwrap();
        assert!(outcome.table.has_attribute(Attribute::Nunits));
        assert!(outcome.diagnostics.contains(|k| *k == DiagnosticKind::NunitsColumnAdded));
    }

    #[test]
    fn missing_unit_column_is_added_in_front() {
        let columns: Vec<String> = UnitTable::with_attributes(&Attribute::REQUIRED)
            .columns()
            .iter()
            .filter(|c| c.as_str() != UNIT_COLUMN)
            .cloned()
            .collect();
        let input = UnitTable::from_units(columns, vec![baseload("", 5.0)]);
        let outcome = cluster_units(&input, &config(ClusteringMethod::NoClustering)).unwrap();
        assert_eq!(outcome.table.columns()[0], UNIT_COLUMN);
        assert_eq!(outcome.table.units()[0].name, "[0] -");
        assert!(outcome.diagnostics.contains(|k| *k == DiagnosticKind::UnitColumnAdded));
        assert!(!input.has_column(UNIT_COLUMN));
    }

    #[test]
    fn builder_records_members_in_join_order() {
        let rules = MergeRules::for_table(ClusteringMethod::Standard, &table(vec![]));
        let encoder = FingerprintEncoder::new(20).unwrap();
        let a = baseload("a", 10.0);
        let mut builder = ClusterBuilder::new(rules);
        builder.open(3, &a, encoder.encode(&a));
        builder.absorb(0, 7, &baseload("b", 20.0));
        let clusters = builder.finish();
        assert_eq!(clusters[0].members, vec![3, 7]);
        assert_eq!(clusters[0].representative.get(Attribute::PowerCapacity), 30.0);
    }
}
