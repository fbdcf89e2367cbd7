use time::Date;

use crate::error::EvaluationError;

use super::consumption::{ConsumptionHistory, ConsumptionRecord};
use super::types::{FuelType, Period};
use super::weather::WeatherHistory;

/// Boundaries of the intervention window.
///
/// Records ending on or before `baseline_end` form the baseline; records
/// starting on or after `reporting_start` form the reporting period.
/// Records straddling either boundary belong to neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectPeriods {
    pub baseline_end: Date,
    pub reporting_start: Date,
}

impl ProjectPeriods {
    pub fn new(baseline_end: Date, reporting_start: Date) -> Self {
        Self {
            baseline_end,
            reporting_start,
        }
    }

    /// Returns the period a record falls in, if any.
    pub fn classify(&self, record: &ConsumptionRecord) -> Option<Period> {
        if record.end <= self.baseline_end {
            Some(Period::Baseline)
        } else if record.start >= self.reporting_start {
            Some(Period::Reporting)
        } else {
            None
        }
    }
}

/// A single site with metered consumption and local weather.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub consumption: Vec<ConsumptionHistory>,
    pub weather: WeatherHistory,
    pub periods: ProjectPeriods,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        consumption: Vec<ConsumptionHistory>,
        weather: WeatherHistory,
        periods: ProjectPeriods,
    ) -> Self {
        Self {
            id: id.into(),
            consumption,
            weather,
            periods,
        }
    }

    /// Consumption history for `fuel`, if the project meters it.
    pub fn history(&self, fuel: FuelType) -> Option<&ConsumptionHistory> {
        self.consumption.iter().find(|h| h.fuel == fuel)
    }

    /// Fuels with a consumption history, in the order supplied.
    pub fn fuels(&self) -> Vec<FuelType> {
        self.consumption.iter().map(|h| h.fuel).collect()
    }

    /// Checks the structural preconditions of an evaluation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProject` naming the first violated precondition.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        let invalid = |reason: String| EvaluationError::InvalidProject {
            project: self.id.clone(),
            reason,
        };

        if self.consumption.is_empty() {
            return Err(invalid("no consumption history".to_string()));
        }
        for (i, h) in self.consumption.iter().enumerate() {
            if self.consumption[..i].iter().any(|other| other.fuel == h.fuel) {
                return Err(invalid(format!("more than one {} history", h.fuel)));
            }
            h.check_invariants().map_err(invalid)?;
        }
        self.weather.check_invariants().map_err(invalid)?;
        if self.periods.baseline_end > self.periods.reporting_start {
            return Err(invalid(format!(
                "baseline ends {} after reporting starts {}",
                self.periods.baseline_end, self.periods.reporting_start
            )));
        }
        Ok(())
    }
}
