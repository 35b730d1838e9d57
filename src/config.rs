//! TOML-based installation files and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::loads::{LoadCategory, Location, Supply, SupplyType};
use crate::session::{InputUnit, LoadRow, LoadSchedule};

/// Top-level installation description parsed from TOML.
///
/// Load from TOML with [`InstallationConfig::from_toml_file`] or pick a
/// built-in preset with [`InstallationConfig::from_preset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallationConfig {
    /// Installation category selecting the diversity table.
    #[serde(default)]
    pub location: Location,
    /// Supply voltage, arrangement and default power factor.
    #[serde(default)]
    pub supply: SupplyConfig,
    /// One entry per load row.
    #[serde(default)]
    pub loads: Vec<LoadEntryConfig>,
}

/// Supply parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupplyConfig {
    /// Nominal voltage (V); line-to-line for three-phase.
    pub voltage_v: f64,
    /// `"single-phase"` or `"three-phase"`.
    pub phase: SupplyType,
    /// Power factor used for rows that do not set their own.
    pub power_factor: f64,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            voltage_v: 230.0,
            phase: SupplyType::SinglePhase,
            power_factor: 1.0,
        }
    }
}

/// One load row.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadEntryConfig {
    /// Sub-category name, e.g. `"ring-main-sockets"`. Unknown names fall
    /// back to small power.
    pub category: String,
    /// Per-unit value in `unit`.
    pub value: f64,
    #[serde(default)]
    pub unit: InputUnit,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Overrides `supply.power_factor` for this row.
    #[serde(default)]
    pub power_factor: Option<f64>,
    #[serde(default)]
    pub has_cooker_socket: bool,
    #[serde(default)]
    pub thermostatically_controlled: bool,
}

fn default_quantity() -> u32 {
    1
}

impl LoadEntryConfig {
    fn amps(category: &str, value: f64) -> Self {
        Self {
            category: category.to_string(),
            value,
            unit: InputUnit::Amps,
            quantity: 1,
            power_factor: None,
            has_cooker_socket: false,
            thermostatically_controlled: false,
        }
    }

    fn kilowatts(category: &str, value: f64) -> Self {
        Self {
            unit: InputUnit::Kilowatts,
            ..Self::amps(category, value)
        }
    }

    fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    fn power_factor(mut self, power_factor: f64) -> Self {
        self.power_factor = Some(power_factor);
        self
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"loads[2].quantity"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl InstallationConfig {
    /// Three-circuit domestic installation: lighting, ring sockets, cooker.
    pub fn domestic() -> Self {
        Self {
            location: Location::Domestic,
            supply: SupplyConfig::default(),
            loads: vec![
                LoadEntryConfig::amps("led-lighting", 10.0),
                LoadEntryConfig::amps("ring-main-sockets", 24.0),
                LoadEntryConfig::amps("electric-cooker", 30.0),
            ],
        }
    }

    /// Small office on a three-phase supply.
    pub fn small_office() -> Self {
        Self {
            location: Location::Commercial,
            supply: SupplyConfig {
                voltage_v: 400.0,
                phase: SupplyType::ThreePhase,
                power_factor: 0.95,
            },
            loads: vec![
                LoadEntryConfig::kilowatts("led-lighting", 6.0).power_factor(1.0),
                LoadEntryConfig::kilowatts("emergency-lighting", 0.5).power_factor(1.0),
                LoadEntryConfig::amps("ring-main-sockets", 32.0).quantity(4),
                LoadEntryConfig::kilowatts("panel-heaters", 2.0).quantity(6),
                LoadEntryConfig::kilowatts("ev-charging", 7.4).quantity(2),
                LoadEntryConfig::kilowatts("lift-motor", 11.0).power_factor(0.85),
            ],
        }
    }

    /// Light industrial workshop with motor loads.
    pub fn workshop() -> Self {
        Self {
            location: Location::Industrial,
            supply: SupplyConfig {
                voltage_v: 400.0,
                phase: SupplyType::ThreePhase,
                power_factor: 0.9,
            },
            loads: vec![
                LoadEntryConfig::kilowatts("general-lighting", 4.0).power_factor(1.0),
                LoadEntryConfig::kilowatts("single-motor", 7.5).power_factor(0.85),
                LoadEntryConfig::kilowatts("motor-group", 4.0)
                    .quantity(3)
                    .power_factor(0.85),
                LoadEntryConfig::amps("radial-sockets", 16.0).quantity(3),
                LoadEntryConfig::amps("dedicated-sockets", 32.0),
                LoadEntryConfig::kilowatts("immersion-heater", 3.0).power_factor(1.0),
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["domestic", "small_office", "workshop"];

    /// Loads an installation from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "domestic" => Ok(Self::domestic()),
            "small_office" => Ok(Self::small_office()),
            "workshop" => Ok(Self::workshop()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses an installation from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "installation".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses an installation from a TOML string.
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

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.supply;

        if !(s.voltage_v.is_finite() && s.voltage_v > 0.0) {
            errors.push(ConfigError {
                field: "supply.voltage_v".into(),
                message: "must be > 0".into(),
            });
        }
        if !(s.power_factor > 0.0 && s.power_factor <= 1.0) {
            errors.push(ConfigError {
                field: "supply.power_factor".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }

        if self.loads.is_empty() {
            errors.push(ConfigError {
                field: "loads".into(),
                message: "at least one load is required".into(),
            });
        }

        for (i, load) in self.loads.iter().enumerate() {
            if !(load.value.is_finite() && load.value > 0.0) {
                errors.push(ConfigError {
                    field: format!("loads[{i}].value"),
                    message: "must be > 0".into(),
                });
            }
            if load.quantity == 0 {
                errors.push(ConfigError {
                    field: format!("loads[{i}].quantity"),
                    message: "must be >= 1".into(),
                });
            }
            if let Some(pf) = load.power_factor {
                if !(pf > 0.0 && pf <= 1.0) {
                    errors.push(ConfigError {
                        field: format!("loads[{i}].power_factor"),
                        message: "must be in (0.0, 1.0]".into(),
                    });
                }
            }
        }

        errors
    }

    /// Supply described by this configuration.
    pub fn supply(&self) -> Supply {
        Supply {
            voltage_v: self.supply.voltage_v,
            phase: self.supply.phase,
        }
    }

    /// Builds an editable schedule holding one row per configured load.
    pub fn to_schedule(&self) -> LoadSchedule {
        let mut schedule = LoadSchedule::new(self.location, self.supply());
        for load in &self.loads {
            let row = LoadRow::new(LoadCategory::resolve(&load.category), load.value, load.unit)
                .with_quantity(load.quantity)
                .with_power_factor(load.power_factor.unwrap_or(self.supply.power_factor))
                .with_cooker_socket(load.has_cooker_socket)
                .with_thermostatic_control(load.thermostatically_controlled);
            schedule.add(row);
        }
        schedule
    }
}
