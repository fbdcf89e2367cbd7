//! Closed set of value kinds a result entry can hold.

use std::fmt;

use crate::data::ConsumptionHistory;
use crate::error::EvaluationError;
use crate::model::{FittedModel, UsageEstimate};

/// Category of a per-fuel failure recorded in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Insufficient or degenerate data for the regression.
    ModelFit,
    /// Baseline annualized usage was zero.
    UndefinedSavings,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::ModelFit => f.write_str("model_fit"),
            FailureKind::UndefinedSavings => f.write_str("undefined_savings"),
        }
    }
}

/// Marker left in the store when a fuel could not be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureMarker {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureMarker {
    /// Converts a recoverable error into a marker; `None` for fatal errors.
    pub fn from_error(err: &EvaluationError) -> Option<Self> {
        let kind = match err {
            EvaluationError::ModelFit { .. } => FailureKind::ModelFit,
            EvaluationError::UndefinedSavings { .. } => FailureKind::UndefinedSavings,
            _ => return None,
        };
        Some(Self {
            kind,
            message: err.to_string(),
        })
    }
}

/// Value stored under a name and tag set.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Scalar(f64),
    Flag(bool),
    Consumption(ConsumptionHistory),
    Model(FittedModel),
    Usage(UsageEstimate),
    Failure(FailureMarker),
}

impl Payload {
    /// Short name of the variant, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Scalar(_) => "scalar",
            Payload::Flag(_) => "flag",
            Payload::Consumption(_) => "consumption",
            Payload::Model(_) => "model",
            Payload::Usage(_) => "usage",
            Payload::Failure(_) => "failure",
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Payload::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Payload::Flag(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_consumption(&self) -> Option<&ConsumptionHistory> {
        match self {
            Payload::Consumption(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&FittedModel> {
        match self {
            Payload::Model(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_usage(&self) -> Option<&UsageEstimate> {
        match self {
            Payload::Usage(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_failure(&self) -> Option<&FailureMarker> {
        match self {
            Payload::Failure(f) => Some(f),
            _ => None,
        }
    }
}
