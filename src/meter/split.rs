use tracing::debug;

use crate::data::{FuelType, Period};
use crate::error::EvaluationError;
use crate::store::{Payload, ResultStore};

use super::context::EvaluationContext;
use super::{Meter, names};

/// Flags which fuels have a consumption history.
pub struct FuelPresence {
    fuels: Vec<FuelType>,
}

impl FuelPresence {
    pub fn new(fuels: impl IntoIterator<Item = FuelType>) -> Self {
        Self {
            fuels: fuels.into_iter().collect(),
        }
    }
}

impl Meter for FuelPresence {
    fn name(&self) -> &str {
        "fuel_presence"
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        for &fuel in &self.fuels {
            let present = ctx.project.history(fuel).is_some();
            store.set(
                names::FUEL_PRESENT,
                ctx.tags(&[fuel.tag()]),
                Payload::Flag(present),
                self.name(),
            )?;
        }
        Ok(())
    }
}

/// Splits the in-scope fuel's history into baseline and reporting periods.
///
/// Records that straddle the gap between the periods are dropped.
pub struct SplitPeriods;

impl Meter for SplitPeriods {
    fn name(&self) -> &str {
        "split_periods"
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        let fuel = ctx.fuel(self.name())?;
        let history = ctx
            .project
            .history(fuel)
            .ok_or_else(|| EvaluationError::InvalidProject {
                project: ctx.project.id.clone(),
                reason: format!("no consumption history for {fuel}"),
            })?;

        let periods = &ctx.project.periods;
        for period in Period::ALL {
            let part = history.filtered(|r| periods.classify(r) == Some(period));
            debug!(%fuel, %period, records = part.records.len(), "split");
            store.set(
                names::CONSUMPTION,
                ctx.tags(&[period.tag()]),
                Payload::Consumption(part),
                self.name(),
            )?;
        }
        Ok(())
    }
}

/// Writes the span and total usage of the in-scope period's consumption.
pub struct PeriodSummary;

impl Meter for PeriodSummary {
    fn name(&self) -> &str {
        "period_summary"
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        let history = store.consumption(names::CONSUMPTION, ctx.scope())?;
        let span = history.time_span_days() as f64;
        let total = history.total_usage();
        store.set(
            names::TIME_SPAN_DAYS,
            ctx.scope().clone(),
            Payload::Scalar(span),
            self.name(),
        )?;
        store.set(
            names::TOTAL_USAGE,
            ctx.scope().clone(),
            Payload::Scalar(total),
            self.name(),
        )
    }
}
