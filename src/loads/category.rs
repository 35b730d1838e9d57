//! User-facing load sub-categories and their mapping onto the engine's closed [`LoadType`] set.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::warn;

use super::LoadType;
use crate::rules::DiversityRule;

/// Sub-category as chosen in a load entry form.
///
/// Many sub-categories collapse onto one [`LoadType`]; some also carry their
/// own allowance (e.g. emergency lighting is never diversified).
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum LoadCategory {
    GeneralLighting,
    LedLighting,
    EmergencyLighting,
    RingMainSockets,
    RadialSockets,
    DedicatedSockets,
    ElectricCooker,
    Hob,
    Oven,
    ImmersionHeater,
    InstantaneousWaterHeater,
    ElectricShower,
    StorageHeaters,
    PanelHeaters,
    HeatPumps,
    UnderfloorHeating,
    SingleMotor,
    MotorGroup,
    LiftMotor,
    EvCharging,
    ServerEquipment,
    Other,
}

impl LoadCategory {
    /// Resolves a sub-category name, falling back to [`LoadCategory::Other`].
    ///
    /// Unknown names fail open to `small-power` rather than rejecting the
    /// row; the fallback is logged so it does not go unnoticed.
    pub fn resolve(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Self::from_str(&normalized).unwrap_or_else(|_| {
            warn!(
                category = name,
                "unmapped load sub-category, treating as small-power"
            );
            LoadCategory::Other
        })
    }

    /// Engine load type this sub-category maps onto.
    pub fn load_type(&self) -> LoadType {
        match self {
            LoadCategory::GeneralLighting
            | LoadCategory::LedLighting
            | LoadCategory::EmergencyLighting => LoadType::Lighting,
            LoadCategory::RingMainSockets
            | LoadCategory::RadialSockets
            | LoadCategory::DedicatedSockets => LoadType::SocketOutlet,
            LoadCategory::ElectricCooker | LoadCategory::Hob | LoadCategory::Oven => {
                LoadType::Cooker
            }
            LoadCategory::ImmersionHeater
            | LoadCategory::InstantaneousWaterHeater
            | LoadCategory::ElectricShower => LoadType::WaterHeating,
            LoadCategory::StorageHeaters
            | LoadCategory::PanelHeaters
            | LoadCategory::HeatPumps
            | LoadCategory::UnderfloorHeating => LoadType::SpaceHeating,
            LoadCategory::SingleMotor | LoadCategory::MotorGroup | LoadCategory::LiftMotor => {
                LoadType::Motor
            }
            LoadCategory::EvCharging | LoadCategory::ServerEquipment | LoadCategory::Other => {
                LoadType::SmallPower
            }
        }
    }

    /// Allowance replacing the table rule, if this sub-category has one.
    pub fn rule_override(&self) -> Option<DiversityRule> {
        match self {
            LoadCategory::EmergencyLighting
            | LoadCategory::DedicatedSockets
            | LoadCategory::ImmersionHeater
            | LoadCategory::StorageHeaters
            | LoadCategory::UnderfloorHeating
            | LoadCategory::LiftMotor
            | LoadCategory::EvCharging
            | LoadCategory::ServerEquipment => Some(DiversityRule::NoDiversity),
            LoadCategory::SingleMotor => Some(DiversityRule::FlatPercent { factor: 0.75 }),
            LoadCategory::MotorGroup => Some(DiversityRule::FlatPercent { factor: 0.6 }),
            _ => None,
        }
    }
}
