// cluster/fingerprint.rs
//! Discretisation of a unit's technical parameters into slice indices.
//!
//! Two units with the same fingerprint fall in the same slice for every one of the
//! [`FINGERPRINT_ATTRIBUTES`], which is what the Standard and LP clustered methods use as
//! their similarity test.

use crate::error::{Error, Result};
use crate::types::{Attribute, Unit};

/// Attributes that make up a fingerprint, in vector order.
pub const FINGERPRINT_ATTRIBUTES: [Attribute; 9] = [
    Attribute::PartLoadMin,
    Attribute::RampUpRate,
    Attribute::RampDownRate,
    Attribute::StartUpTime,
    Attribute::MinUpTime,
    Attribute::MinDownTime,
    Attribute::NoLoadCost,
    Attribute::StartUpCost,
    Attribute::Efficiency,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([usize; 9]);

impl Fingerprint {
    pub fn bins(&self) -> &[usize; 9] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Spacing {
    Linear,
    /// Denser near `low`; timing parameters cluster at small values.
    Log,
}

/// Boundary layout per fingerprint attribute: (spacing, low, high).
fn slicing(attr: Attribute) -> (Spacing, f64, f64) {
    match attr {
        Attribute::StartUpTime => (Spacing::Log, 0.0, 36.0),
        Attribute::MinUpTime | Attribute::MinDownTime => (Spacing::Log, 0.0, 168.0),
        Attribute::NoLoadCost => (Spacing::Linear, 0.0, 50.0),
        Attribute::StartUpCost => (Spacing::Linear, 0.0, 500.0),
        _ => (Spacing::Linear, 0.0, 1.0),
    }
}

/// `n` evenly spaced points from `low` to `high`, both included.
pub fn linspace(low: f64, high: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![low],
        _ => {
            let step = (high - low) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { high } else { low + i as f64 * step })
                .collect()
        }
    }
}

/// `n` points from `low` to `high` whose gaps grow geometrically.
///
/// The domain is shifted so that `low` maps to 1, log-spaced up to `high + low + 1`, then
/// shifted back by `low + 1`.
pub fn shifted_logspace(low: f64, high: f64, n: usize) -> Vec<f64> {
    linspace(0.0, (high + low + 1.0).log10(), n)
        .into_iter()
        .map(|exponent| 10f64.powf(exponent) - (low + 1.0))
        .collect()
}

/// Index of the boundary closest to `value`; the first one wins on ties.
pub fn nearest_index(bounds: &[f64], value: f64) -> usize {
    if value.is_nan() {
        return 0;
    }
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, bound) in bounds.iter().enumerate() {
        let distance = (bound - value).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

/// Precomputed slice boundaries for every fingerprint attribute.
#[derive(Debug, Clone)]
pub struct FingerprintEncoder {
    nslices: usize,
    bounds: Vec<Vec<f64>>,
}

impl FingerprintEncoder {
    pub fn new(nslices: usize) -> Result<Self> {
        if nslices == 0 {
            return Err(Error::config("nslices must be greater than 0"));
        }
        let bounds = FINGERPRINT_ATTRIBUTES
            .iter()
            .map(|attr| match slicing(*attr) {
                (Spacing::Linear, low, high) => linspace(low, high, nslices),
                (Spacing::Log, low, high) => shifted_logspace(low, high, nslices),
            })
            .collect();
        Ok(Self { nslices, bounds })
    }

    pub fn nslices(&self) -> usize {
        self.nslices
    }

    pub fn boundaries(&self, attr: Attribute) -> Option<&[f64]> {
        FINGERPRINT_ATTRIBUTES
            .iter()
            .position(|a| *a == attr)
            .map(|pos| self.bounds[pos].as_slice())
    }

    /// Slice index of `value` for `attr`, or `None` if `attr` is not fingerprinted.
    pub fn bin(&self, attr: Attribute, value: f64) -> Option<usize> {
        self.boundaries(attr).map(|bounds| nearest_index(bounds, value))
    }

    pub fn encode(&self, unit: &Unit) -> Fingerprint {
        let mut bins = [0usize; 9];
        for (slot, (attr, bounds)) in FINGERPRINT_ATTRIBUTES.iter().zip(&self.bounds).enumerate() {
            bins[slot] = nearest_index(bounds, unit.get(*attr));
        }
        Fingerprint(bins)
    }

    pub fn encode_all(&self, units: &[Unit]) -> Vec<Fingerprint> {
        units.iter().map(|unit| self.encode(unit)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_ends() {
        let space = linspace(0.0, 1.0, 5);
        assert_eq!(space, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(0.0, 50.0, 1), vec![0.0]);
        assert_eq!(linspace(0.0, 500.0, 20).last(), Some(&500.0));
    }

    #[test]
    fn logspace_is_anchored_and_bunched_near_zero() {
        let space = shifted_logspace(0.0, 36.0, 20);
        assert_eq!(space.len(), 20);
        assert!(space[0].abs() < 1e-12);
        assert!((space[19] - 36.0).abs() < 1e-9);
        let first_gap = space[1] - space[0];
        let last_gap = space[19] - space[18];
        assert!(first_gap < 0.5);
        assert!(last_gap > 5.0);
        assert!(space.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn nearest_prefers_lowest_index_on_ties() {
        let bounds = [0.0, 1.0, 2.0];
        assert_eq!(nearest_index(&bounds, 0.5), 0);
        assert_eq!(nearest_index(&bounds, 1.5), 1);
        assert_eq!(nearest_index(&bounds, 1.6), 2);
        assert_eq!(nearest_index(&bounds, -4.0), 0);
        assert_eq!(nearest_index(&bounds, 99.0), 2);
        assert_eq!(nearest_index(&bounds, f64::NAN), 0);
    }

    #[test]
    fn bins_follow_attribute_ranges() {
        let encoder = FingerprintEncoder::new(20).unwrap();
        // Boundaries are k/19 on the unit interval.
        assert_eq!(encoder.bin(Attribute::Efficiency, 0.48), Some(9));
        assert_eq!(encoder.bin(Attribute::Efficiency, 0.53), Some(10));
        assert_eq!(encoder.bin(Attribute::NoLoadCost, 50.0), Some(19));
        assert_eq!(encoder.bin(Attribute::StartUpCost, 0.0), Some(0));
        assert_eq!(encoder.bin(Attribute::MinUpTime, 168.0), Some(19));
        assert_eq!(encoder.bin(Attribute::PowerCapacity, 10.0), None);
    }

    #[test]
    fn encode_reads_the_nine_attributes() {
        let encoder = FingerprintEncoder::new(20).unwrap();
        let unit = Unit::new("GT")
            .with(Attribute::PartLoadMin, 1.0)
            .with(Attribute::Efficiency, 1.0)
            .with(Attribute::PowerCapacity, 400.0);
        let fp = encoder.encode(&unit);
        assert_eq!(fp.bins(), &[19, 0, 0, 0, 0, 0, 0, 0, 19]);
        assert_eq!(encoder.encode_all(&[unit.clone(), unit]).len(), 2);
    }

    #[test]
    fn zero_slices_is_a_configuration_error() {
        assert!(FingerprintEncoder::new(0).is_err());
        let single = FingerprintEncoder::new(1).unwrap();
        assert_eq!(single.boundaries(Attribute::StartUpTime).unwrap().len(), 1);
    }
}
