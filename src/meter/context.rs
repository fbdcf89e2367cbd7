use crate::data::{DailyTemperatures, FuelType, Period, Project};
use crate::error::EvaluationError;
use crate::store::Tags;

/// Read-only inputs shared by every meter in a run, plus the tag scope of
/// the branch currently executing.
#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    pub project: &'a Project,
    /// Daily mean temperatures of the project's weather history.
    pub weather: &'a DailyTemperatures,
    /// Daily mean temperatures of the normal year.
    pub normals: &'a DailyTemperatures,
    scope: Tags,
}

impl<'a> EvaluationContext<'a> {
    /// Creates a root context with an empty scope.
    pub fn new(
        project: &'a Project,
        weather: &'a DailyTemperatures,
        normals: &'a DailyTemperatures,
    ) -> Self {
        Self {
            project,
            weather,
            normals,
            scope: Tags::new(),
        }
    }

    /// Tags every result written in this branch carries.
    pub fn scope(&self) -> &Tags {
        &self.scope
    }

    /// Child context with `tag` added to the scope.
    pub fn scoped(&self, tag: &str) -> Self {
        Self {
            scope: self.scope.with(tag),
            ..self.clone()
        }
    }

    /// The scope plus `extra`.
    pub fn tags(&self, extra: &[&str]) -> Tags {
        extra.iter().fold(self.scope.clone(), |acc, t| acc.with(*t))
    }

    /// Fuel named by the scope.
    ///
    /// # Errors
    ///
    /// Returns `MissingScope` if no fuel tag is in scope.
    pub fn fuel(&self, meter: &str) -> Result<FuelType, EvaluationError> {
        self.scope
            .iter()
            .find_map(FuelType::from_tag)
            .ok_or_else(|| EvaluationError::MissingScope {
                meter: meter.to_string(),
                dimension: "fuel",
            })
    }

    /// Period named by the scope.
    ///
    /// # Errors
    ///
    /// Returns `MissingScope` if no period tag is in scope.
    pub fn period(&self, meter: &str) -> Result<Period, EvaluationError> {
        self.scope
            .iter()
            .find_map(Period::from_tag)
            .ok_or_else(|| EvaluationError::MissingScope {
                meter: meter.to_string(),
                dimension: "period",
            })
    }
}
