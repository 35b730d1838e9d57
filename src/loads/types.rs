//! Engine input types: load classification, installation location, supply and circuit loads.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::errors::DiversityError;
use crate::rules::DiversityRule;

/// Closed set of load types the diversity tables are keyed on.
///
/// Declaration order is the canonical order of the result breakdown.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LoadType {
    Lighting,
    SocketOutlet,
    Cooker,
    WaterHeating,
    SpaceHeating,
    Motor,
    SmallPower,
}

impl LoadType {
    /// Human-readable name used in breakdowns and reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            LoadType::Lighting => "Lighting",
            LoadType::SocketOutlet => "Socket Outlets",
            LoadType::Cooker => "Cooking Appliances",
            LoadType::WaterHeating => "Water Heating",
            LoadType::SpaceHeating => "Space Heating",
            LoadType::Motor => "Motors",
            LoadType::SmallPower => "Small Power",
        }
    }

    /// Parses the kebab-case form, rejecting anything outside the closed set.
    ///
    /// # Errors
    ///
    /// Returns [`DiversityError::UnknownLoadType`] for unrecognised names.
    pub fn parse(s: &str) -> Result<Self, DiversityError> {
        Self::from_str(s.trim()).map_err(|_| DiversityError::UnknownLoadType(s.to_string()))
    }
}

/// Installation category; selects which diversity table applies.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Location {
    #[default]
    Domestic,
    Commercial,
    Industrial,
}

impl Location {
    /// Parses `domestic`, `commercial` or `industrial`.
    ///
    /// # Errors
    ///
    /// Returns [`DiversityError::UnknownLocation`] for anything else.
    pub fn parse(s: &str) -> Result<Self, DiversityError> {
        Self::from_str(s.trim()).map_err(|_| DiversityError::UnknownLocation(s.to_string()))
    }
}

/// Supply arrangement used to convert between power and line current.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SupplyType {
    #[default]
    SinglePhase,
    ThreePhase,
}

/// Supply context carried at the call site rather than per circuit.
///
/// For three-phase supplies `voltage_v` is the line-to-line voltage.
///
/// # Examples
///
/// ```
/// use load_diversity::loads::{Supply, SupplyType};
///
/// let supply = Supply::three_phase(400.0);
/// assert_eq!(supply.phase, SupplyType::ThreePhase);
/// assert_eq!(Supply::default().voltage_v, 230.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    /// Nominal supply voltage (V).
    pub voltage_v: f64,
    /// Single- or three-phase.
    #[serde(default)]
    pub phase: SupplyType,
}

impl Supply {
    pub fn single_phase(voltage_v: f64) -> Self {
        Self {
            voltage_v,
            phase: SupplyType::SinglePhase,
        }
    }

    pub fn three_phase(voltage_v: f64) -> Self {
        Self {
            voltage_v,
            phase: SupplyType::ThreePhase,
        }
    }
}

impl Default for Supply {
    fn default() -> Self {
        Self::single_phase(230.0)
    }
}

/// One classified load entry as submitted to the engine.
///
/// `design_current_a` and `installed_power_kw` are totals for the entry
/// (per-unit values already multiplied by `quantity`). The engine trusts
/// them as given; converting between the two is the caller's job, see
/// [`crate::conversion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitLoad {
    /// Identifier, unique within one calculation request.
    pub id: String,
    #[serde(rename = "type")]
    pub load_type: LoadType,
    /// Total design current for the entry (A).
    pub design_current_a: f64,
    /// Total installed power for the entry (kW).
    pub installed_power_kw: f64,
    /// Number of identical units represented by this entry.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub has_cooker_socket: bool,
    #[serde(default)]
    pub thermostatically_controlled: bool,
    /// Sub-category rule resolved upstream; `None` uses the location table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_override: Option<DiversityRule>,
}

fn default_quantity() -> u32 {
    1
}

impl CircuitLoad {
    /// Creates a single-unit load with no flags and the table rule for its type.
    pub fn new(
        id: impl Into<String>,
        load_type: LoadType,
        design_current_a: f64,
        installed_power_kw: f64,
        location: Location,
    ) -> Self {
        Self {
            id: id.into(),
            load_type,
            design_current_a,
            installed_power_kw,
            quantity: 1,
            location,
            has_cooker_socket: false,
            thermostatically_controlled: false,
            rule_override: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_cooker_socket(mut self, has_cooker_socket: bool) -> Self {
        self.has_cooker_socket = has_cooker_socket;
        self
    }

    pub fn with_thermostatic_control(mut self, thermostatically_controlled: bool) -> Self {
        self.thermostatically_controlled = thermostatically_controlled;
        self
    }

    pub fn with_rule_override(mut self, rule: Option<DiversityRule>) -> Self {
        self.rule_override = rule;
        self
    }

    /// Current of one unit, assuming the entry's units are identical.
    pub fn unit_current_a(&self) -> f64 {
        self.design_current_a / f64::from(self.quantity.max(1))
    }
}
