//! TOML-based evaluation settings and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::data::FuelType;
use crate::model::ModelKind;

/// Top-level evaluation settings parsed from TOML.
///
/// All sections have defaults matching the standard residential
/// evaluation. Load from TOML with [`MeterSettings::from_toml_file`] or use
/// [`MeterSettings::residential`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeterSettings {
    /// Degree-day regression parameters.
    #[serde(default)]
    pub fit: FitSettings,
    /// Projection onto normal-year weather.
    #[serde(default)]
    pub annualize: AnnualizeSettings,
    /// Which fuels to evaluate and how.
    #[serde(default)]
    pub evaluation: EvaluationSettings,
}

/// Degree-day regression parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitSettings {
    /// Lowest candidate heating base temperature (°F).
    pub heating_base_min_f: f64,
    /// Highest candidate heating base temperature (°F).
    pub heating_base_max_f: f64,
    /// Lowest candidate cooling base temperature (°F).
    pub cooling_base_min_f: f64,
    /// Highest candidate cooling base temperature (°F).
    pub cooling_base_max_f: f64,
    /// Spacing of the candidate grid (°F, must be > 0).
    pub base_step_f: f64,
    /// Minimum usable records per period.
    pub min_records: usize,
    /// Model form fitted to electricity usage.
    pub electricity_model: ModelKind,
    /// Model form fitted to natural gas usage.
    pub natural_gas_model: ModelKind,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            heating_base_min_f: 50.0,
            heating_base_max_f: 75.0,
            cooling_base_min_f: 60.0,
            cooling_base_max_f: 85.0,
            base_step_f: 1.0,
            min_records: 3,
            electricity_model: ModelKind::HeatingAndCooling,
            natural_gas_model: ModelKind::HeatingOnly,
        }
    }
}

impl FitSettings {
    /// Model form configured for `fuel`.
    pub fn model_for(&self, fuel: FuelType) -> ModelKind {
        match fuel {
            FuelType::Electricity => self.electricity_model,
            FuelType::NaturalGas => self.natural_gas_model,
        }
    }
}

/// Projection onto normal-year weather.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnualizeSettings {
    /// Standard-normal multiplier of the confidence band (1.96 ≈ 95%).
    pub confidence_z: f64,
}

impl Default for AnnualizeSettings {
    fn default() -> Self {
        Self { confidence_z: 1.96 }
    }
}

/// Which fuels to evaluate and how.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationSettings {
    /// Fuels to evaluate, in order. Fuels the project lacks are skipped.
    pub fuels: Vec<FuelType>,
    /// Run per-fuel branches on worker threads.
    pub parallel_fuels: bool,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            fuels: FuelType::ALL.to_vec(),
            parallel_fuels: false,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(thiserror::Error, Debug)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"fit.base_step_f"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl MeterSettings {
    /// Returns the standard residential settings.
    pub fn residential() -> Self {
        Self::default()
    }

    /// Returns the coarse preset: 2 °F grid for quick screening runs.
    pub fn coarse() -> Self {
        Self {
            fit: FitSettings {
                base_step_f: 2.0,
                ..FitSettings::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["residential", "coarse"];

    /// Loads settings from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "residential" => Ok(Self::residential()),
            "coarse" => Ok(Self::coarse()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "settings".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all constraints, returning every violation found.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| {
            errors.push(ConfigError {
                field: field.into(),
                message: message.into(),
            });
        };

        let fit = &self.fit;
        if !(fit.base_step_f > 0.0) {
            push("fit.base_step_f", "must be > 0");
        }
        if fit.heating_base_min_f > fit.heating_base_max_f {
            push("fit.heating_base_min_f", "must be <= fit.heating_base_max_f");
        }
        if fit.cooling_base_min_f > fit.cooling_base_max_f {
            push("fit.cooling_base_min_f", "must be <= fit.cooling_base_max_f");
        }
        if fit.min_records == 0 {
            push("fit.min_records", "must be > 0");
        }

        if !(self.annualize.confidence_z > 0.0) {
            push("annualize.confidence_z", "must be > 0");
        }

        let fuels = &self.evaluation.fuels;
        if fuels.is_empty() {
            push("evaluation.fuels", "must name at least one fuel");
        }
        if fuels
            .iter()
            .enumerate()
            .any(|(i, f)| fuels[..i].contains(f))
        {
            push("evaluation.fuels", "must not repeat a fuel");
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residential_preset_valid() {
        let cfg = MeterSettings::residential();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "residential should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = MeterSettings::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in MeterSettings::PRESETS {
            let cfg = MeterSettings::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[fit]
heating_base_min_f = 55.0
heating_base_max_f = 70.0
cooling_base_min_f = 65.0
cooling_base_max_f = 80.0
base_step_f = 0.5
min_records = 6
electricity_model = "cooling_only"
natural_gas_model = "heating_only"

[annualize]
confidence_z = 1.645

[evaluation]
fuels = ["natural_gas"]
parallel_fuels = true
"#;
        let cfg = MeterSettings::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.fit.min_records), Some(6));
        assert_eq!(
            cfg.as_ref().map(|c| c.fit.electricity_model),
            Some(ModelKind::CoolingOnly)
        );
        assert_eq!(
            cfg.as_ref().map(|c| c.evaluation.fuels.clone()),
            Some(vec![FuelType::NaturalGas])
        );
        assert_eq!(cfg.as_ref().map(|c| c.evaluation.parallel_fuels), Some(true));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[fit]
min_records = 4
"#;
        let cfg = MeterSettings::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.fit.min_records), Some(4));
        assert_eq!(cfg.as_ref().map(|c| c.fit.base_step_f), Some(1.0));
        assert_eq!(cfg.as_ref().map(|c| c.annualize.confidence_z), Some(1.96));
        assert_eq!(cfg.as_ref().map(|c| c.evaluation.fuels.len()), Some(2));
    }

    #[test]
    fn unknown_field_rejected() {
        let toml = r#"
[fit]
min_records = 3
bogus_field = true
"#;
        assert!(MeterSettings::from_toml_str(toml).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MeterSettings::from_toml_file(Path::new("no/such/settings.toml"));
        assert!(err.is_err_and(|e| e.field == "settings" && e.message.contains("settings.toml")));
    }

    #[test]
    fn unknown_model_kind_rejected() {
        let toml = r#"
[fit]
natural_gas_model = "quadratic"
"#;
        assert!(MeterSettings::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_zero_step() {
        let mut cfg = MeterSettings::residential();
        cfg.fit.base_step_f = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "fit.base_step_f"));
    }

    #[test]
    fn validation_catches_inverted_range() {
        let mut cfg = MeterSettings::residential();
        cfg.fit.cooling_base_min_f = 90.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "fit.cooling_base_min_f"));
    }

    #[test]
    fn validation_catches_repeated_fuel() {
        let mut cfg = MeterSettings::residential();
        cfg.evaluation.fuels = vec![FuelType::Electricity, FuelType::Electricity];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "evaluation.fuels"));
    }

    #[test]
    fn model_for_fuel_uses_configured_kind() {
        let cfg = MeterSettings::residential();
        assert_eq!(
            cfg.fit.model_for(FuelType::NaturalGas),
            ModelKind::HeatingOnly
        );
        assert_eq!(
            cfg.fit.model_for(FuelType::Electricity),
            ModelKind::HeatingAndCooling
        );
    }
}
