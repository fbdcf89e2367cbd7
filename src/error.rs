//! Error taxonomy for a savings evaluation run.

use crate::data::{FuelType, Period};
use crate::store::Tags;

/// Why the degree-day fitter could not produce a model.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FitFailure {
    #[error("{found} usable records, at least {required} required")]
    InsufficientRecords { found: usize, required: usize },
    #[error("no candidate base temperature produced a usable regression")]
    Degenerate,
}

/// Errors raised while evaluating a project.
///
/// `ModelFit` and `UndefinedSavings` are scoped to one fuel and are caught
/// at the per-fuel fan-out; every other variant aborts the run.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("model fit failed for {fuel} {period}: {reason}")]
    ModelFit {
        fuel: FuelType,
        period: Period,
        reason: FitFailure,
    },
    #[error("savings undefined for {fuel}: baseline annualized usage is zero")]
    UndefinedSavings { fuel: FuelType },
    #[error("result \"{name}\" {tags} already written")]
    DuplicateResult { name: String, tags: Tags },
    #[error("result \"{name}\" {tags} matched {matches} entries, exactly one required")]
    AmbiguousOrMissingResult {
        name: String,
        tags: Tags,
        matches: usize,
    },
    #[error("result \"{name}\" does not hold a {expected} payload")]
    PayloadMismatch { name: String, expected: &'static str },
    #[error("meter \"{meter}\" needs a {dimension} tag in scope")]
    MissingScope {
        meter: String,
        dimension: &'static str,
    },
    #[error("invalid project \"{project}\": {reason}")]
    InvalidProject { project: String, reason: String },
    #[error("invalid normal-year weather: {reason}")]
    InvalidNormals { reason: String },
    #[error("invalid settings: {reason}")]
    InvalidSettings { reason: String },
}

impl EvaluationError {
    /// Returns `true` for data-quality failures confined to one fuel.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EvaluationError::ModelFit { .. } | EvaluationError::UndefinedSavings { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fuel_scoped_errors_are_recoverable() {
        let fit = EvaluationError::ModelFit {
            fuel: FuelType::NaturalGas,
            period: Period::Baseline,
            reason: FitFailure::Degenerate,
        };
        assert!(fit.is_recoverable());
        assert!(EvaluationError::UndefinedSavings {
            fuel: FuelType::Electricity
        }
        .is_recoverable());

        let dup = EvaluationError::DuplicateResult {
            name: "savings".into(),
            tags: Tags::from(["electricity"]),
        };
        assert!(!dup.is_recoverable());
        let invalid = EvaluationError::InvalidProject {
            project: "p".into(),
            reason: "no consumption".into(),
        };
        assert!(!invalid.is_recoverable());
    }

    #[test]
    fn model_fit_message_names_fuel_and_period() {
        let err = EvaluationError::ModelFit {
            fuel: FuelType::NaturalGas,
            period: Period::Reporting,
            reason: FitFailure::InsufficientRecords {
                found: 2,
                required: 3,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("natural_gas"));
        assert!(msg.contains("reporting"));
        assert!(msg.contains("2 usable records"));
    }
}
