//! Composable evaluation nodes ("meters") and the standard residential pipeline.
//!
//! A meter reads inputs from the [`ResultStore`] by name and tag, computes,
//! and writes its outputs back under the current scope. Composite meters
//! ([`Sequence`], [`Condition`], [`FanOut`]) arrange leaf meters into a
//! static tree built once and evaluated per project.

pub mod compose;
pub mod context;
/// Model fitting and annualization stages.
pub mod fit;
pub mod residential;
/// Savings stages.
pub mod savings;
/// Fuel presence, period split, and period summary stages.
pub mod split;

pub use compose::{Condition, FanOut, Noop, Sequence};
pub use context::EvaluationContext;
pub use fit::{Annualize, FitModel};
pub use residential::{DefaultResidentialMeter, SavingsOutcome, savings_outcome};
pub use savings::{GrossSavings, Savings};
pub use split::{FuelPresence, PeriodSummary, SplitPeriods};

use crate::error::EvaluationError;
use crate::store::ResultStore;

/// Documented result names.
pub mod names {
    /// Flag: the project has a history for the fuel. Tags: fuel.
    pub const FUEL_PRESENT: &str = "fuel_present";
    /// Consumption history restricted to one period. Tags: fuel, period.
    pub const CONSUMPTION: &str = "consumption";
    pub const TIME_SPAN_DAYS: &str = "time_span_days";
    pub const TOTAL_USAGE: &str = "total_usage";
    /// Fitted degree-day model. Tags: fuel, period.
    pub const MODEL: &str = "model";
    /// Normal-year usage estimate. Tags: fuel, period.
    pub const ANNUALIZED_USAGE: &str = "annualized_usage";
    /// Baseline model over reporting weather minus reporting usage. Tags: fuel.
    pub const GROSS_SAVINGS: &str = "gross_savings";
    /// `(pre − post) / pre` of annualized usage. Tags: fuel.
    pub const SAVINGS: &str = "savings";
    /// `pre − post` of annualized usage. Tags: fuel.
    pub const ANNUALIZED_SAVINGS: &str = "annualized_savings";
    /// Failure marker left by a fan-out branch. Tags: branch scope.
    pub const EVALUATION_FAILURE: &str = "evaluation_failure";
}

/// A named unit of computation over the result store.
pub trait Meter: Send + Sync {
    /// Name recorded as the provenance of every entry this meter writes.
    fn name(&self) -> &str;

    /// Reads inputs from `store`, computes, and appends outputs.
    ///
    /// Entries written before an error stay in the store.
    ///
    /// # Errors
    ///
    /// Propagates any error from missing inputs, failed calculations, or
    /// duplicate writes.
    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError>;
}
