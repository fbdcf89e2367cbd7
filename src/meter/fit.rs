use crate::config::FitSettings;
use crate::error::EvaluationError;
use crate::model::{Annualizer, DegreeDayFitter};
use crate::store::{Payload, ResultStore};

use super::context::EvaluationContext;
use super::{Meter, names};

/// Fits a degree-day model to the in-scope fuel and period.
///
/// Reads `consumption`, writes `model`. The model form comes from the
/// fuel's entry in [`FitSettings`].
pub struct FitModel {
    fitter: DegreeDayFitter,
    settings: FitSettings,
}

impl FitModel {
    pub fn new(settings: &FitSettings) -> Self {
        Self {
            fitter: DegreeDayFitter::from_settings(settings),
            settings: settings.clone(),
        }
    }
}

impl Meter for FitModel {
    fn name(&self) -> &str {
        "fit_model"
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        let fuel = ctx.fuel(self.name())?;
        let period = ctx.period(self.name())?;
        let history = store.consumption(names::CONSUMPTION, ctx.scope())?;
        let model = self
            .fitter
            .fit(self.settings.model_for(fuel), history, ctx.weather, period)?;
        store.set(
            names::MODEL,
            ctx.scope().clone(),
            Payload::Model(model),
            self.name(),
        )
    }
}

/// Projects the in-scope model onto the normal year.
///
/// Reads `model`, writes `annualized_usage`.
pub struct Annualize {
    annualizer: Annualizer,
}

impl Annualize {
    pub fn new(annualizer: Annualizer) -> Self {
        Self { annualizer }
    }
}

impl Meter for Annualize {
    fn name(&self) -> &str {
        "annualize"
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        let model = store.model(names::MODEL, ctx.scope())?;
        let estimate = self.annualizer.annualize(model, ctx.normals);
        store.set(
            names::ANNUALIZED_USAGE,
            ctx.scope().clone(),
            Payload::Usage(estimate),
            self.name(),
        )
    }
}
