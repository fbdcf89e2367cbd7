//! Weather-response usage models: fitting and projection.

/// Degree-day arithmetic and candidate grids.
pub mod degree_days;
pub mod fitter;
pub mod projector;
/// Least-squares solver.
pub mod regression;

use serde::Deserialize;

pub use fitter::DegreeDayFitter;
pub use projector::{Annualizer, UsageEstimate};

use degree_days::{cooling_degree_days, heating_degree_days};

/// Functional form of a degree-day model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// `usage/day = a + bh·HDD(Th)`
    HeatingOnly,
    /// `usage/day = a + bc·CDD(Tc)`
    CoolingOnly,
    /// `usage/day = a + bh·HDD(Th) + bc·CDD(Tc)` with `Th <= Tc`
    HeatingAndCooling,
}

impl ModelKind {
    /// Number of regression coefficients, intercept included.
    pub fn parameter_count(self) -> usize {
        match self {
            ModelKind::HeatingOnly | ModelKind::CoolingOnly => 2,
            ModelKind::HeatingAndCooling => 3,
        }
    }

    pub fn uses_heating(self) -> bool {
        matches!(self, ModelKind::HeatingOnly | ModelKind::HeatingAndCooling)
    }

    pub fn uses_cooling(self) -> bool {
        matches!(self, ModelKind::CoolingOnly | ModelKind::HeatingAndCooling)
    }
}

/// Temperature sensitivity above or below a base temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensitivity {
    /// Base temperature (°F).
    pub base_temp_f: f64,
    /// Usage per degree day.
    pub slope: f64,
}

/// A degree-day model fitted to one fuel and period.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    pub kind: ModelKind,
    /// Weather-independent usage per day.
    pub intercept: f64,
    pub heating: Option<Sensitivity>,
    pub cooling: Option<Sensitivity>,
    /// Root-mean-square error of usage per day, `sqrt(SSE / (n − p))`.
    pub rmse: f64,
    /// `rmse` divided by mean usage per day. Lower is better.
    pub cvrmse: f64,
    /// Records used in the fit.
    pub n_records: usize,
    pub mean_usage_per_day: f64,
}

impl FittedModel {
    /// Predicted usage for one day at daily mean temperature `temp_f`.
    pub fn predict_daily(&self, temp_f: f64) -> f64 {
        let mut usage = self.intercept;
        if let Some(h) = self.heating {
            usage += h.slope * heating_degree_days(temp_f, h.base_temp_f);
        }
        if let Some(c) = self.cooling {
            usage += c.slope * cooling_degree_days(temp_f, c.base_temp_f);
        }
        usage
    }

    /// Predicted usage over a run of days.
    pub fn predict_total(&self, temps: impl IntoIterator<Item = f64>) -> f64 {
        temps.into_iter().map(|t| self.predict_daily(t)).sum()
    }
}
