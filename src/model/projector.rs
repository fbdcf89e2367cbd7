//! Projection of fitted models onto daily weather.

use crate::config::AnnualizeSettings;
use crate::data::DailyTemperatures;
use crate::error::EvaluationError;

use super::FittedModel;

/// Usage estimate with a symmetric confidence band clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageEstimate {
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
    /// Days the estimate covers.
    pub days: usize,
}

impl UsageEstimate {
    /// `true` when `usage` lies inside the band.
    pub fn contains(&self, usage: f64) -> bool {
        usage >= self.lower && usage <= self.upper
    }
}

/// Projects fitted models onto weather series.
#[derive(Debug, Clone, Copy)]
pub struct Annualizer {
    confidence_z: f64,
}

impl Annualizer {
    pub fn new(confidence_z: f64) -> Self {
        Self { confidence_z }
    }

    pub fn from_settings(settings: &AnnualizeSettings) -> Self {
        Self::new(settings.confidence_z)
    }

    /// Sums daily predictions over `temps`.
    ///
    /// The band half-width is `z · rmse · days / sqrt(n_records)`: the
    /// standard error of the fitted daily rate scaled to the projected span.
    /// It shrinks as the fit improves and both bounds are clamped at zero.
    pub fn project(&self, model: &FittedModel, temps: impl IntoIterator<Item = f64>) -> UsageEstimate {
        let mut days = 0_usize;
        let mut value = 0.0;
        for t in temps {
            value += model.predict_daily(t);
            days += 1;
        }

        let n = model.n_records.max(1) as f64;
        let half_width = self.confidence_z * model.rmse * days as f64 / n.sqrt();

        UsageEstimate {
            value,
            lower: (value - half_width).max(0.0),
            upper: (value + half_width).max(0.0),
            days,
        }
    }

    /// Projects onto a normal year.
    pub fn annualize(&self, model: &FittedModel, normals: &DailyTemperatures) -> UsageEstimate {
        self.project(model, normals.values())
    }
}

/// Checks that `normals` holds one representative year of daily means.
///
/// # Errors
///
/// Returns `InvalidNormals` unless there are 365 or 366 days.
pub fn check_normals(normals: &DailyTemperatures) -> Result<(), EvaluationError> {
    match normals.len() {
        365 | 366 => Ok(()),
        n => Err(EvaluationError::InvalidNormals {
            reason: format!("expected 365 or 366 daily means, found {n}"),
        }),
    }
}
