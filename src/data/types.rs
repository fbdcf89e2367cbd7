//! Fuel and period dimensions shared by the data model and result tags.

use std::fmt;

use serde::Deserialize;

/// Metered fuel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Electricity,
    NaturalGas,
}

impl FuelType {
    /// Every supported fuel, in evaluation order.
    pub const ALL: [FuelType; 2] = [FuelType::Electricity, FuelType::NaturalGas];

    /// Tag under which results for this fuel are stored.
    pub fn tag(self) -> &'static str {
        match self {
            FuelType::Electricity => "electricity",
            FuelType::NaturalGas => "natural_gas",
        }
    }

    /// Parses a result tag back into a fuel.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.tag() == tag)
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Evaluation period relative to the intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Baseline,
    Reporting,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::Baseline, Period::Reporting];

    pub fn tag(self) -> &'static str {
        match self {
            Period::Baseline => "baseline",
            Period::Reporting => "reporting",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Unit of a consumption quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageUnit {
    KilowattHours,
    Therms,
}

impl UsageUnit {
    /// Conventional billing unit for a fuel.
    pub fn for_fuel(fuel: FuelType) -> Self {
        match fuel {
            FuelType::Electricity => UsageUnit::KilowattHours,
            FuelType::NaturalGas => UsageUnit::Therms,
        }
    }
}

impl fmt::Display for UsageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageUnit::KilowattHours => f.write_str("kWh"),
            UsageUnit::Therms => f.write_str("therm"),
        }
    }
}
