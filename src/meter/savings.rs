use tracing::debug;

use crate::data::Period;
use crate::error::EvaluationError;
use crate::store::{Payload, ResultStore};

use super::context::EvaluationContext;
use super::{Meter, names};

/// Counterfactual savings over the reporting period.
///
/// Projects the baseline model over the actual weather of each reporting
/// record and subtracts the metered usage. Records without weather are
/// left out of both sides.
pub struct GrossSavings;

impl Meter for GrossSavings {
    fn name(&self) -> &str {
        "gross_savings"
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        let model = store.model(names::MODEL, &ctx.tags(&[Period::Baseline.tag()]))?;
        let reporting = store.consumption(names::CONSUMPTION, &ctx.tags(&[Period::Reporting.tag()]))?;

        let mut predicted = 0.0;
        let mut actual = 0.0;
        for record in &reporting.records {
            let temps = ctx.weather.between(record.start, record.end);
            if temps.is_empty() {
                continue;
            }
            let rate = model.predict_total(temps.iter().copied()) / temps.len() as f64;
            predicted += rate * record.days() as f64;
            actual += record.usage;
        }

        debug!(scope = %ctx.scope(), predicted, actual, "gross savings");
        store.set(
            names::GROSS_SAVINGS,
            ctx.scope().clone(),
            Payload::Scalar(predicted - actual),
            self.name(),
        )
    }
}

/// Fractional and absolute savings of annualized usage.
///
/// Reads `annualized_usage` for both periods and writes `savings`
/// (`(pre − post) / pre`) and `annualized_savings` (`pre − post`).
pub struct Savings;

impl Meter for Savings {
    fn name(&self) -> &str {
        "savings"
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        let fuel = ctx.fuel(self.name())?;
        let pre = store
            .usage(names::ANNUALIZED_USAGE, &ctx.tags(&[Period::Baseline.tag()]))?
            .value;
        let post = store
            .usage(names::ANNUALIZED_USAGE, &ctx.tags(&[Period::Reporting.tag()]))?
            .value;

        if pre.abs() <= f64::EPSILON {
            return Err(EvaluationError::UndefinedSavings { fuel });
        }

        store.set(
            names::SAVINGS,
            ctx.scope().clone(),
            Payload::Scalar((pre - post) / pre),
            self.name(),
        )?;
        store.set(
            names::ANNUALIZED_SAVINGS,
            ctx.scope().clone(),
            Payload::Scalar(pre - post),
            self.name(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        ConsumptionHistory, ConsumptionRecord, DailyTemperatures, FuelType, Project,
        ProjectPeriods, WeatherHistory,
    };
    use crate::model::{FittedModel, ModelKind, Sensitivity, UsageEstimate};
    use crate::store::Tags;
    use time::Duration;
    use time::macros::date;

    fn project() -> Project {
        Project::new(
            "savings",
            Vec::new(),
            WeatherHistory::new("x", Vec::new()),
            ProjectPeriods::new(date!(2013 - 01 - 01), date!(2013 - 01 - 01)),
        )
    }

    fn usage(value: f64) -> Payload {
        Payload::Usage(UsageEstimate {
            value,
            lower: value,
            upper: value,
            days: 365,
        })
    }

    fn store_with(pre: f64, post: f64) -> ResultStore {
        let mut store = ResultStore::new();
        for (period, v) in [("baseline", pre), ("reporting", post)] {
            store
                .set(
                    names::ANNUALIZED_USAGE,
                    Tags::from(["electricity", period]),
                    usage(v),
                    "test",
                )
                .expect("seed");
        }
        store
    }

    #[test]
    fn half_usage_is_fifty_percent_savings() {
        let p = project();
        let daily = DailyTemperatures::default();
        let ctx = EvaluationContext::new(&p, &daily, &daily).scoped("electricity");
        let mut store = store_with(1000.0, 500.0);
        Savings.evaluate(&ctx, &mut store).expect("savings");
        let scope = Tags::from(["electricity"]);
        assert_eq!(store.scalar(names::SAVINGS, &scope).ok(), Some(0.5));
        assert_eq!(store.scalar(names::ANNUALIZED_SAVINGS, &scope).ok(), Some(500.0));
    }

    #[test]
    fn zero_baseline_is_undefined() {
        let p = project();
        let daily = DailyTemperatures::default();
        let ctx = EvaluationContext::new(&p, &daily, &daily).scoped("electricity");
        let mut store = store_with(0.0, 10.0);
        assert_eq!(
            Savings.evaluate(&ctx, &mut store),
            Err(EvaluationError::UndefinedSavings {
                fuel: FuelType::Electricity
            })
        );
        assert!(!store.contains(names::SAVINGS, &Tags::new()));
    }

    #[test]
    fn gross_savings_uses_reporting_weather() {
        let p = project();
        let start = date!(2013 - 01 - 01);
        // 20 days at 55°F then 10 days without weather.
        let weather =
            DailyTemperatures::from_days((0..20).map(|d| (start + Duration::days(d), 55.0)));
        let ctx = EvaluationContext::new(&p, &weather, &weather).scoped("natural_gas");

        let model = FittedModel {
            kind: ModelKind::HeatingOnly,
            intercept: 1.0,
            heating: Some(Sensitivity {
                base_temp_f: 65.0,
                slope: 0.2,
            }),
            cooling: None,
            rmse: 0.0,
            cvrmse: 0.0,
            n_records: 12,
            mean_usage_per_day: 3.0,
        };
        let reporting = ConsumptionHistory::new(
            FuelType::NaturalGas,
            vec![
                ConsumptionRecord::new(start, start + Duration::days(10), 20.0),
                ConsumptionRecord::new(
                    start + Duration::days(10),
                    start + Duration::days(20),
                    15.0,
                ),
                ConsumptionRecord::new(
                    start + Duration::days(20),
                    start + Duration::days(30),
                    99.0,
                ),
            ],
        );
        let mut store = ResultStore::new();
        store
            .set(
                names::MODEL,
                Tags::from(["natural_gas", "baseline"]),
                Payload::Model(model),
                "test",
            )
            .expect("model");
        store
            .set(
                names::CONSUMPTION,
                Tags::from(["natural_gas", "reporting"]),
                Payload::Consumption(reporting),
                "test",
            )
            .expect("consumption");

        GrossSavings.evaluate(&ctx, &mut store).expect("gross");
        // 3.0 per day for 20 covered days, against 35 metered.
        let gross = store
            .scalar(names::GROSS_SAVINGS, &Tags::from(["natural_gas"]))
            .expect("gross savings");
        assert!((gross - 25.0).abs() < 1e-9);
    }
}
