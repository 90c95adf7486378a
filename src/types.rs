use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

/// Column holding the human-readable unit name.
pub const UNIT_COLUMN: &str = "Unit";

/// Numeric attributes of a generating unit, named after their column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    PowerCapacity,
    PartLoadMin,
    RampUpRate,
    RampDownRate,
    StartUpTime,
    MinUpTime,
    MinDownTime,
    NoLoadCost,
    StartUpCost,
    Efficiency,
    RampingCost,
    Nunits,
    STOCapacity,
    STOMaxChargingPower,
    InitialPower,
    MinEfficiency,
    STOChargingEfficiency,
    CO2Intensity,
    STOSelfDischarge,
    CHPPowerToHeat,
    CHPPowerLossFactor,
}

impl Attribute {
    pub const COUNT: usize = 21;

    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::PowerCapacity,
        Attribute::PartLoadMin,
        Attribute::RampUpRate,
        Attribute::RampDownRate,
        Attribute::StartUpTime,
        Attribute::MinUpTime,
        Attribute::MinDownTime,
        Attribute::NoLoadCost,
        Attribute::StartUpCost,
        Attribute::Efficiency,
        Attribute::RampingCost,
        Attribute::Nunits,
        Attribute::STOCapacity,
        Attribute::STOMaxChargingPower,
        Attribute::InitialPower,
        Attribute::MinEfficiency,
        Attribute::STOChargingEfficiency,
        Attribute::CO2Intensity,
        Attribute::STOSelfDischarge,
        Attribute::CHPPowerToHeat,
        Attribute::CHPPowerLossFactor,
    ];

    /// Columns without which clustering cannot run.
    pub const REQUIRED: [Attribute; 10] = [
        Attribute::PowerCapacity,
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

    /// Quantities that scale with the number of sub-units a row stands for.
    pub const CAPACITY_LIKE: [Attribute; 4] = [
        Attribute::PowerCapacity,
        Attribute::STOCapacity,
        Attribute::STOMaxChargingPower,
        Attribute::InitialPower,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::PowerCapacity => "PowerCapacity",
            Attribute::PartLoadMin => "PartLoadMin",
            Attribute::RampUpRate => "RampUpRate",
            Attribute::RampDownRate => "RampDownRate",
            Attribute::StartUpTime => "StartUpTime",
            Attribute::MinUpTime => "MinUpTime",
            Attribute::MinDownTime => "MinDownTime",
            Attribute::NoLoadCost => "NoLoadCost",
            Attribute::StartUpCost => "StartUpCost",
            Attribute::Efficiency => "Efficiency",
            Attribute::RampingCost => "RampingCost",
            Attribute::Nunits => "Nunits",
            Attribute::STOCapacity => "STOCapacity",
            Attribute::STOMaxChargingPower => "STOMaxChargingPower",
            Attribute::InitialPower => "InitialPower",
            Attribute::MinEfficiency => "MinEfficiency",
            Attribute::STOChargingEfficiency => "STOChargingEfficiency",
            Attribute::CO2Intensity => "CO2Intensity",
            Attribute::STOSelfDischarge => "STOSelfDischarge",
            Attribute::CHPPowerToHeat => "CHPPowerToHeat",
            Attribute::CHPPowerLossFactor => "CHPPowerLossFactor",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|attr| attr.as_str() == name)
    }

    /// Value used when the column is absent or the cell is empty.
    pub fn default_value(&self) -> f64 {
        match self {
            Attribute::Nunits => 1.0,
            _ => 0.0,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// String-valued attributes that must agree for two units to be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Zone,
    Technology,
    Fuel,
    ChpType,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Zone,
        Category::Technology,
        Category::Fuel,
        Category::ChpType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Zone => "Zone",
            Category::Technology => "Technology",
            Category::Fuel => "Fuel",
            Category::ChpType => "CHPType",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|cat| cat.as_str() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// One row of the unit table.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub name: String,
    categories: [String; 4],
    values: [f64; Attribute::COUNT],
    /// Columns this crate does not interpret, keyed by header.
    pub extra: BTreeMap<String, String>,
}

impl Unit {
    pub fn new<S: Into<String>>(name: S) -> Self {
        let mut values = [0.0; Attribute::COUNT];
        values[Attribute::Nunits.slot()] = Attribute::Nunits.default_value();
        Self {
            name: name.into(),
            categories: Default::default(),
            values,
            extra: BTreeMap::new(),
        }
    }

    pub fn get(&self, attr: Attribute) -> f64 {
        self.values[attr.slot()]
    }

    pub fn set(&mut self, attr: Attribute, value: f64) {
        self.values[attr.slot()] = value;
    }

    pub fn with(mut self, attr: Attribute, value: f64) -> Self {
        self.set(attr, value);
        self
    }

    pub fn category(&self, cat: Category) -> &str {
        &self.categories[cat.slot()]
    }

    pub fn set_category<S: Into<String>>(&mut self, cat: Category, value: S) {
        self.categories[cat.slot()] = value.into();
    }

    pub fn with_category<S: Into<String>>(mut self, cat: Category, value: S) -> Self {
        self.set_category(cat, value);
        self
    }

    /// Zone, technology, fuel and CHP type all match.
    pub fn same_type(&self, other: &Unit) -> bool {
        self.categories == other.categories
    }
}

/// An ordered set of units together with the column schema they were read with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitTable {
    columns: Vec<String>,
    units: Vec<Unit>,
}

impl UnitTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, units: Vec::new() }
    }

    pub fn from_units(columns: Vec<String>, units: Vec<Unit>) -> Self {
        Self { columns, units }
    }

    /// Schema carrying the unit name, the categorical columns and every numeric attribute
    /// listed, in that order.
    pub fn with_attributes(attrs: &[Attribute]) -> Self {
        let columns = std::iter::once(UNIT_COLUMN)
            .chain(Category::ALL.iter().map(Category::as_str))
            .chain(attrs.iter().map(Attribute::as_str))
            .map(str::to_string)
            .collect();
        Self::new(columns)
    }

    pub fn push(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn has_attribute(&self, attr: Attribute) -> bool {
        self.has_column(attr.as_str())
    }

    /// Appends the column to the schema if missing. Returns true when it was added.
    pub fn ensure_column(&mut self, name: &str) -> bool {
        if self.has_column(name) {
            return false;
        }
        self.columns.push(name.to_string());
        true
    }

    /// Like [`UnitTable::ensure_column`] but puts the column first.
    pub fn ensure_leading_column(&mut self, name: &str) -> bool {
        if self.has_column(name) {
            return false;
        }
        self.columns.insert(0, name.to_string());
        true
    }

    /// Attributes from `candidates` that are part of this table's schema.
    pub fn present(&self, candidates: &[Attribute]) -> Vec<Attribute> {
        candidates.iter().copied().filter(|a| self.has_attribute(*a)).collect()
    }

    pub fn total(&self, attr: Attribute) -> f64 {
        self.units.iter().map(|u| u.get(attr)).sum()
    }
}
