//! Location-keyed dispatch table mapping each load type to its diversity rule.
//!
//! Domestic installations follow IET On-Site Guide Table 1B; commercial and
//! industrial installations share Table H2.

use serde::Serialize;
use strum::IntoEnumIterator;

use super::DiversityRule;
use crate::loads::{LoadType, Location};

/// A rule together with the table citation it comes from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleEntry {
    #[serde(rename = "type")]
    pub load_type: LoadType,
    pub rule: DiversityRule,
    pub regulation: String,
    pub description: String,
}

/// Complete rule set for one installation location, in canonical type order.
#[derive(Debug, Clone, Serialize)]
pub struct RuleTable {
    pub location: Location,
    pub entries: Vec<RuleEntry>,
}

impl RuleTable {
    /// Builds the table for `location`; every [`LoadType`] has exactly one entry.
    pub fn for_location(location: Location) -> Self {
        let entries = LoadType::iter()
            .map(|load_type| {
                let rule = default_rule(load_type, location);
                RuleEntry {
                    load_type,
                    rule,
                    regulation: citation(load_type, location),
                    description: rule.describe(),
                }
            })
            .collect();
        Self { location, entries }
    }
}

/// Name of the diversity table applying to `location`.
pub fn table_name(location: Location) -> &'static str {
    match location {
        Location::Domestic => "Table 1B",
        Location::Commercial | Location::Industrial => "Table H2",
    }
}

/// The table rule for a load type at a location.
pub fn default_rule(load_type: LoadType, location: Location) -> DiversityRule {
    match location {
        Location::Domestic => match load_type {
            LoadType::Lighting => DiversityRule::FlatPercent { factor: 0.66 },
            LoadType::SocketOutlet => DiversityRule::TieredThreshold {
                threshold_a: 10.0,
                remainder_factor: 0.5,
                socket_adder_a: None,
            },
            LoadType::Cooker => DiversityRule::TieredThreshold {
                threshold_a: 10.0,
                remainder_factor: 0.3,
                socket_adder_a: Some(5.0),
            },
            LoadType::WaterHeating | LoadType::SpaceHeating => DiversityRule::ConditionalFlag {
                remainder_factor: 0.75,
            },
            LoadType::Motor => DiversityRule::MotorGroup {
                single_factor: 0.75,
                group_factor: 0.6,
            },
            LoadType::SmallPower => DiversityRule::NoDiversity,
        },
        Location::Commercial | Location::Industrial => match load_type {
            LoadType::Lighting => DiversityRule::FlatPercent { factor: 0.9 },
            LoadType::SocketOutlet => DiversityRule::TieredThreshold {
                threshold_a: 10.0,
                remainder_factor: 0.5,
                socket_adder_a: None,
            },
            LoadType::Cooker => DiversityRule::FlatPercent { factor: 0.8 },
            LoadType::WaterHeating => DiversityRule::NoDiversity,
            LoadType::SpaceHeating => DiversityRule::ConditionalFlag {
                remainder_factor: 0.8,
            },
            LoadType::Motor => DiversityRule::MotorGroup {
                single_factor: 0.75,
                group_factor: 0.6,
            },
            LoadType::SmallPower => DiversityRule::NoDiversity,
        },
    }
}

/// Citation for the table item covering `load_type`.
pub fn citation(load_type: LoadType, location: Location) -> String {
    let item = match load_type {
        LoadType::Lighting => "item 1",
        LoadType::SpaceHeating => "item 2",
        LoadType::Cooker => "item 3",
        LoadType::Motor => "item 4",
        LoadType::WaterHeating => "items 5-6",
        LoadType::SocketOutlet => "item 9",
        LoadType::SmallPower => "item 10",
    };
    format!("IET On-Site Guide {}, {item}", table_name(location))
}

/// Citation used when a sub-category rule replaces the table rule.
pub fn override_citation(location: Location) -> String {
    format!(
        "IET On-Site Guide {} (sub-category allowance)",
        table_name(location)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_location_covers_every_type() {
        for location in Location::iter() {
            let table = RuleTable::for_location(location);
            assert_eq!(table.entries.len(), LoadType::iter().count());
            let types: Vec<LoadType> = table.entries.iter().map(|e| e.load_type).collect();
            assert_eq!(types, LoadType::iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn domestic_lighting_is_sixty_six_percent() {
        assert_eq!(
            default_rule(LoadType::Lighting, Location::Domestic),
            DiversityRule::FlatPercent { factor: 0.66 }
        );
    }

    #[test]
    fn cooker_socket_adder_is_domestic_only() {
        assert!(matches!(
            default_rule(LoadType::Cooker, Location::Domestic),
            DiversityRule::TieredThreshold {
                socket_adder_a: Some(_),
                ..
            }
        ));
        assert!(matches!(
            default_rule(LoadType::Cooker, Location::Commercial),
            DiversityRule::FlatPercent { .. }
        ));
    }

    #[test]
    fn commercial_and_industrial_share_table_h2() {
        for load_type in LoadType::iter() {
            assert_eq!(
                default_rule(load_type, Location::Commercial),
                default_rule(load_type, Location::Industrial)
            );
        }
        assert_eq!(
            citation(LoadType::Cooker, Location::Industrial),
            "IET On-Site Guide Table H2, item 3"
        );
    }

    #[test]
    fn domestic_citation_names_table_1b() {
        assert_eq!(
            citation(LoadType::SocketOutlet, Location::Domestic),
            "IET On-Site Guide Table 1B, item 9"
        );
    }
}
