//! Variable-base degree-day regression.
//!
//! Each consumption record becomes one observation: usage per day against
//! average degree days per day over the record's days with weather. The
//! fitter runs an OLS regression for every candidate base temperature (or
//! heating/cooling pair) on a fixed grid and keeps the candidate with the
//! lowest CVRMSE.

use tracing::debug;

use crate::config::FitSettings;
use crate::data::{ConsumptionHistory, DailyTemperatures, Period};
use crate::error::{EvaluationError, FitFailure};

use super::degree_days::{candidate_bases, mean_cdd, mean_hdd};
use super::regression::{OlsFit, fit_with_intercept};
use super::{FittedModel, ModelKind, Sensitivity};

/// Grid-search degree-day fitter.
#[derive(Debug, Clone)]
pub struct DegreeDayFitter {
    heating_bases: Vec<f64>,
    cooling_bases: Vec<f64>,
    min_records: usize,
}

/// Usage rate and weather of one consumption record.
struct Observation {
    usage_per_day: f64,
    temps: Vec<f64>,
}

/// Best candidate seen so far during the grid search.
struct Candidate {
    fit: OlsFit,
    heating_base: Option<f64>,
    cooling_base: Option<f64>,
    rmse: f64,
    cvrmse: f64,
}

impl DegreeDayFitter {
    /// Creates a fitter over explicit candidate grids.
    ///
    /// # Arguments
    ///
    /// * `heating_bases` - Candidate heating base temperatures (°F), searched in order
    /// * `cooling_bases` - Candidate cooling base temperatures (°F), searched in order
    /// * `min_records` - Minimum usable records per fit
    pub fn new(heating_bases: Vec<f64>, cooling_bases: Vec<f64>, min_records: usize) -> Self {
        Self {
            heating_bases,
            cooling_bases,
            min_records,
        }
    }

    /// Builds the candidate grids from settings.
    pub fn from_settings(settings: &FitSettings) -> Self {
        Self::new(
            candidate_bases(
                settings.heating_base_min_f,
                settings.heating_base_max_f,
                settings.base_step_f,
            ),
            candidate_bases(
                settings.cooling_base_min_f,
                settings.cooling_base_max_f,
                settings.base_step_f,
            ),
            settings.min_records,
        )
    }

    /// Records required for a model of `kind`.
    pub fn required_records(&self, kind: ModelKind) -> usize {
        self.min_records.max(kind.parameter_count() + 1)
    }

    /// Fits a model of `kind` to one period of consumption.
    ///
    /// Records without any weather coverage are dropped before the record
    /// count is checked.
    ///
    /// # Errors
    ///
    /// Returns `ModelFit` with `InsufficientRecords` when too few usable
    /// records remain, or `Degenerate` when no candidate yields a regression
    /// with non-constant regressors and non-negative slopes.
    pub fn fit(
        &self,
        kind: ModelKind,
        history: &ConsumptionHistory,
        weather: &DailyTemperatures,
        period: Period,
    ) -> Result<FittedModel, EvaluationError> {
        let fail = |reason| EvaluationError::ModelFit {
            fuel: history.fuel,
            period,
            reason,
        };

        let observations: Vec<Observation> = history
            .records
            .iter()
            .filter_map(|r| {
                let usage_per_day = r.usage_per_day()?;
                let temps = weather.between(r.start, r.end);
                (!temps.is_empty()).then_some(Observation {
                    usage_per_day,
                    temps,
                })
            })
            .collect();

        let required = self.required_records(kind);
        if observations.len() < required {
            return Err(fail(FitFailure::InsufficientRecords {
                found: observations.len(),
                required,
            }));
        }

        let y: Vec<f64> = observations.iter().map(|o| o.usage_per_day).collect();
        let n = y.len();
        let mean_y = y.iter().sum::<f64>() / n as f64;
        let dof = (n - kind.parameter_count()) as f64;

        let hdd: Vec<Vec<f64>> = if kind.uses_heating() {
            self.heating_bases
                .iter()
                .map(|&b| observations.iter().map(|o| mean_hdd(&o.temps, b)).collect())
                .collect()
        } else {
            Vec::new()
        };
        let cdd: Vec<Vec<f64>> = if kind.uses_cooling() {
            self.cooling_bases
                .iter()
                .map(|&b| observations.iter().map(|o| mean_cdd(&o.temps, b)).collect())
                .collect()
        } else {
            Vec::new()
        };

        let mut best: Option<Candidate> = None;
        let mut consider = |regressors: &[&[f64]], heating_base, cooling_base| {
            let Some(fit) = fit_with_intercept(regressors, &y) else {
                return;
            };
            if fit.coefficients[1..].iter().any(|&s| s < 0.0) {
                return;
            }
            let rmse = (fit.sse / dof).sqrt();
            let cvrmse = cvrmse(rmse, mean_y);
            if best.as_ref().is_none_or(|b| cvrmse < b.cvrmse) {
                best = Some(Candidate {
                    fit,
                    heating_base,
                    cooling_base,
                    rmse,
                    cvrmse,
                });
            }
        };

        match kind {
            ModelKind::HeatingOnly => {
                for (i, &th) in self.heating_bases.iter().enumerate() {
                    consider(&[hdd[i].as_slice()], Some(th), None);
                }
            }
            ModelKind::CoolingOnly => {
                for (j, &tc) in self.cooling_bases.iter().enumerate() {
                    consider(&[cdd[j].as_slice()], None, Some(tc));
                }
            }
            ModelKind::HeatingAndCooling => {
                for (i, &th) in self.heating_bases.iter().enumerate() {
                    for (j, &tc) in self.cooling_bases.iter().enumerate() {
                        if th > tc {
                            continue;
                        }
                        consider(&[hdd[i].as_slice(), cdd[j].as_slice()], Some(th), Some(tc));
                    }
                }
            }
        }

        let best = best.ok_or_else(|| fail(FitFailure::Degenerate))?;
        let mut slopes = best.fit.coefficients[1..].iter().copied();
        let heating = best.heating_base.and_then(|base_temp_f| {
            slopes.next().map(|slope| Sensitivity { base_temp_f, slope })
        });
        let cooling = best.cooling_base.and_then(|base_temp_f| {
            slopes.next().map(|slope| Sensitivity { base_temp_f, slope })
        });

        debug!(
            fuel = %history.fuel,
            %period,
            records = n,
            heating_base = ?best.heating_base,
            cooling_base = ?best.cooling_base,
            cvrmse = best.cvrmse,
            "selected degree-day model"
        );

        Ok(FittedModel {
            kind,
            intercept: best.fit.intercept(),
            heating,
            cooling,
            rmse: best.rmse,
            cvrmse: best.cvrmse,
            n_records: n,
            mean_usage_per_day: mean_y,
        })
    }
}

/// Coefficient of variation of the RMSE.
///
/// Zero mean usage with a perfect fit is reported as `0.0`; with any
/// residual error it is unbounded.
fn cvrmse(rmse: f64, mean_y: f64) -> f64 {
    if mean_y > 0.0 {
        rmse / mean_y
    } else if rmse == 0.0 {
        0.0
    } else {
        f64::INFINITY
    }
}
