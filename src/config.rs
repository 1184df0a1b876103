//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::registry::{HOURS_PER_DAY, Weekday};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation day, participant counts, and seed.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Operator input retry policy.
    #[serde(default)]
    pub input: InputConfig,
    /// Profile strategy parameters.
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

/// Simulation day, participant counts, and seed.
///
/// An empty `day` or a negative count means "prompt the operator"; values
/// given here skip the corresponding prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Day of the week, case-insensitive; empty string prompts the operator.
    pub day: String,
    /// Prosumer count; negative prompts the operator.
    pub prosumers: i64,
    /// Consumer count; negative prompts the operator.
    pub consumers: i64,
    /// Master random seed for profile generation.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            day: String::new(),
            prosumers: -1,
            consumers: -1,
            seed: 42,
        }
    }
}

/// Operator input retry policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Attempts allowed per prompt before the run fails (must be > 0).
    pub max_attempts: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Profile strategy parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfilesConfig {
    /// Strategy: `"solar"` (generated traces) or `"flat"` (constants).
    pub strategy: String,
    /// Lower bound of the per-prosumer capacity band (kWh).
    pub capacity_kwh_min: f32,
    /// Upper bound of the per-prosumer capacity band (kWh).
    pub capacity_kwh_max: f32,
    /// Hour of peak generation.
    pub peak_hour: f32,
    /// Width of the generation bell (hours).
    pub sigma_hours: f32,
    /// Baseline hourly demand (kWh).
    pub demand_base_kwh: f32,
    /// Sinusoidal demand amplitude (kWh).
    pub demand_amp_kwh: f32,
    /// Gaussian demand noise standard deviation (kWh).
    pub demand_noise_std: f32,
    /// Demand multiplier applied on Saturday and Sunday.
    pub weekend_demand_factor: f32,
    /// Hourly generation for the flat strategy (kWh).
    pub flat_generation_kwh: f32,
    /// Hourly demand for the flat strategy (kWh).
    pub flat_demand_kwh: f32,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            strategy: "solar".to_string(),
            capacity_kwh_min: 15.0,
            capacity_kwh_max: 25.0,
            peak_hour: 12.0,
            sigma_hours: 4.0,
            demand_base_kwh: 0.8,
            demand_amp_kwh: 0.7,
            demand_noise_std: 0.05,
            weekend_demand_factor: 1.15,
            flat_generation_kwh: 2.0,
            flat_demand_kwh: 1.5,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"profiles.sigma_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: prompt for day and counts, default
    /// solar traces.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            input: InputConfig::default(),
            profiles: ProfilesConfig::default(),
        }
    }

    /// Returns the high-generation preset: wide capacity band, light demand.
    pub fn high_generation() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            input: InputConfig::default(),
            profiles: ProfilesConfig {
                capacity_kwh_min: 25.0,
                capacity_kwh_max: 40.0,
                sigma_hours: 5.0,
                demand_base_kwh: 0.5,
                demand_amp_kwh: 0.4,
                ..ProfilesConfig::default()
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "high_generation"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "high_generation" => Ok(Self::high_generation()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if !s.day.is_empty() && s.day.parse::<Weekday>().is_err() {
            errors.push(ConfigError {
                field: "simulation.day".into(),
                message: format!("must be a day of the week, got \"{}\"", s.day),
            });
        }

        if self.input.max_attempts == 0 {
            errors.push(ConfigError {
                field: "input.max_attempts".into(),
                message: "must be > 0".into(),
            });
        }

        let p = &self.profiles;
        if p.strategy != "solar" && p.strategy != "flat" {
            errors.push(ConfigError {
                field: "profiles.strategy".into(),
                message: format!("must be \"solar\" or \"flat\", got \"{}\"", p.strategy),
            });
        }
        if p.capacity_kwh_min < 0.0 {
            errors.push(ConfigError {
                field: "profiles.capacity_kwh_min".into(),
                message: "must be >= 0".into(),
            });
        }
        if p.capacity_kwh_min > p.capacity_kwh_max {
            errors.push(ConfigError {
                field: "profiles.capacity_kwh_min".into(),
                message: "must be <= profiles.capacity_kwh_max".into(),
            });
        }
        if !(0.0..HOURS_PER_DAY as f32).contains(&p.peak_hour) {
            errors.push(ConfigError {
                field: "profiles.peak_hour".into(),
                message: "must be in [0, 24)".into(),
            });
        }
        if p.sigma_hours <= 0.0 {
            errors.push(ConfigError {
                field: "profiles.sigma_hours".into(),
                message: "must be > 0".into(),
            });
        }
        for (field, value) in [
            ("profiles.demand_base_kwh", p.demand_base_kwh),
            ("profiles.demand_amp_kwh", p.demand_amp_kwh),
            ("profiles.demand_noise_std", p.demand_noise_std),
            ("profiles.weekend_demand_factor", p.weekend_demand_factor),
            ("profiles.flat_generation_kwh", p.flat_generation_kwh),
            ("profiles.flat_demand_kwh", p.flat_demand_kwh),
        ] {
            if value < 0.0 {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be >= 0".into(),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
day = "saturday"
prosumers = 3
consumers = 4
seed = 99

[input]
max_attempts = 5

[profiles]
strategy = "flat"
flat_generation_kwh = 3.0
flat_demand_kwh = 2.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.prosumers), Some(3));
        assert_eq!(cfg.as_ref().map(|c| c.input.max_attempts), Some(5));
        assert_eq!(cfg.as_ref().map(|c| &*c.profiles.strategy), Some("flat"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 7
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(7));
        // day and counts stay "prompt the operator"
        assert_eq!(cfg.as_ref().map(|c| c.simulation.day.is_empty()), Some(true));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.prosumers), Some(-1));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
seed = 1
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn validation_catches_bad_day() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.day = "Blursday".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.day"));
    }

    #[test]
    fn validation_accepts_configured_day_case_insensitively() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.day = "wednesday".to_string();
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validation_catches_bad_strategy() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.profiles.strategy = "random".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "profiles.strategy"));
    }

    #[test]
    fn validation_catches_inverted_capacity_band() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.profiles.capacity_kwh_min = 30.0;
        cfg.profiles.capacity_kwh_max = 20.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "profiles.capacity_kwh_min")
        );
    }

    #[test]
    fn validation_catches_zero_attempts() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.input.max_attempts = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "input.max_attempts"));
    }

    #[test]
    fn high_generation_has_wider_band() {
        let base = ScenarioConfig::baseline();
        let high = ScenarioConfig::high_generation();
        assert!(high.profiles.capacity_kwh_max > base.profiles.capacity_kwh_max);
    }
}
