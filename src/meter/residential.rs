//! The standard residential evaluation and its result accessors.

use tracing::info;

use crate::config::MeterSettings;
use crate::data::{DailyTemperatures, FuelType, Period, Project, WeatherHistory};
use crate::error::EvaluationError;
use crate::model::Annualizer;
use crate::model::projector::check_normals;
use crate::store::{FailureMarker, ResultStore, Tags};

use super::compose::{Condition, FanOut, Noop, Sequence};
use super::context::EvaluationContext;
use super::fit::{Annualize, FitModel};
use super::savings::{GrossSavings, Savings};
use super::split::{FuelPresence, PeriodSummary, SplitPeriods};
use super::{Meter, names};

/// Pre/post savings evaluation for every configured fuel.
///
/// The meter tree is built once from settings and reused across projects:
///
/// ```text
/// default_residential
///   fuel_presence
///   per_fuel (fan-out over fuels, failures isolated)
///     fuel_present?
///       fuel_evaluation
///         split_periods
///         per_period (fan-out over baseline, reporting)
///           period_evaluation
///             period_summary, fit_model, annualize
///         gross_savings
///         savings
///       skip_fuel
/// ```
pub struct DefaultResidentialMeter {
    normals: DailyTemperatures,
    pipeline: Sequence,
}

impl DefaultResidentialMeter {
    /// Builds the meter tree.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSettings` if `settings` fails validation, or
    /// `InvalidNormals` unless `normals` covers one full year.
    pub fn new(settings: &MeterSettings, normals: &WeatherHistory) -> Result<Self, EvaluationError> {
        let problems = settings.validate();
        if !problems.is_empty() {
            let reason = problems
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(EvaluationError::InvalidSettings { reason });
        }

        normals
            .check_invariants()
            .map_err(|reason| EvaluationError::InvalidNormals { reason })?;
        let normals = normals.daily_temperatures();
        check_normals(&normals)?;

        Ok(Self {
            normals,
            pipeline: build_pipeline(settings),
        })
    }

    /// Root of the meter tree.
    pub fn pipeline(&self) -> &Sequence {
        &self.pipeline
    }

    /// Evaluates one project into a fresh result store.
    ///
    /// Per-fuel data problems are recorded in the store; any other error
    /// aborts the run.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProject` if the project is malformed, or the first
    /// fatal error raised by a meter.
    pub fn evaluate(&self, project: &Project) -> Result<ResultStore, EvaluationError> {
        project.validate()?;
        let weather = project.weather.daily_temperatures();
        info!(
            project = %project.id,
            fuels = project.consumption.len(),
            weather_days = weather.len(),
            "evaluating project"
        );

        let ctx = EvaluationContext::new(project, &weather, &self.normals);
        let mut store = ResultStore::new();
        self.pipeline.evaluate(&ctx, &mut store)?;

        info!(project = %project.id, entries = store.len(), "evaluation complete");
        Ok(store)
    }
}

fn build_pipeline(settings: &MeterSettings) -> Sequence {
    let period_evaluation = Sequence::new("period_evaluation")
        .then(PeriodSummary)
        .then(FitModel::new(&settings.fit))
        .then(Annualize::new(Annualizer::from_settings(&settings.annualize)));

    let fuel_evaluation = Sequence::new("fuel_evaluation")
        .then(SplitPeriods)
        .then(FanOut::new(
            "per_period",
            Period::ALL.map(Period::tag),
            period_evaluation,
        ))
        .then(GrossSavings)
        .then(Savings);

    let fuels = &settings.evaluation.fuels;
    let per_fuel = FanOut::new(
        "per_fuel",
        fuels.iter().map(|f| f.tag()),
        Condition::on_flag(
            "fuel_present",
            names::FUEL_PRESENT,
            fuel_evaluation,
            Noop::new("skip_fuel"),
        ),
    )
    .isolating_failures()
    .in_parallel(settings.evaluation.parallel_fuels);

    Sequence::new("default_residential")
        .then(FuelPresence::new(fuels.iter().copied()))
        .then(per_fuel)
}

/// What a store says about one fuel's savings.
#[derive(Debug, Clone, PartialEq)]
pub enum SavingsOutcome {
    /// Fractional savings were computed.
    Available(f64),
    /// The fuel was evaluated and failed.
    Failed(FailureMarker),
    /// The fuel was absent or not configured.
    NotEvaluated,
}

/// Classifies `fuel`'s savings in a finished store.
pub fn savings_outcome(store: &ResultStore, fuel: FuelType) -> SavingsOutcome {
    let scope = Tags::from([fuel.tag()]);
    if let Ok(savings) = store.scalar(names::SAVINGS, &scope) {
        return SavingsOutcome::Available(savings);
    }
    store
        .get(names::EVALUATION_FAILURE, &scope)
        .into_iter()
        .find_map(|e| e.value.as_failure().cloned())
        .map_or(SavingsOutcome::NotEvaluated, SavingsOutcome::Failed)
}
