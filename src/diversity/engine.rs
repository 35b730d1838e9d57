//! Diversity calculation engine: validate, group, apply rules, aggregate.

use strum::IntoEnumIterator;
use tracing::{debug, info};

use super::types::{DiversityResult, TypeBreakdown, ratio_or_zero};
use crate::conversion::check_supply;
use crate::errors::DiversityError;
use crate::loads::{CircuitLoad, LoadType, Location, Supply};
use crate::rules::table::{citation, default_rule, override_citation};
use crate::rules::{DiversityRule, GroupInput};

/// Computes the diversified maximum demand of a set of circuit loads.
///
/// Loads are grouped by type, location, effective rule and the
/// cooker-socket / thermostatic flags. Groups appear in canonical
/// [`LoadType`] order, and in first-encountered order within a type.
///
/// The result carries full floating-point precision; rounding is left to
/// presentation.
///
/// # Examples
///
/// ```
/// use load_diversity::diversity::calculate_diversity;
/// use load_diversity::loads::{CircuitLoad, LoadType, Location, Supply};
///
/// let sockets = CircuitLoad::new("ring", LoadType::SocketOutlet, 24.0, 5.52, Location::Domestic);
/// let result = calculate_diversity(&[sockets], &Supply::single_phase(230.0)).unwrap();
/// assert_eq!(result.diversified_current_a, 17.0);
/// assert_eq!(result.breakdown_by_type[0].formula, "10A @ 100% + 14A @ 50% = 17A");
/// ```
///
/// # Errors
///
/// Returns a [`DiversityError`] when `circuits` is empty, the supply voltage
/// is not positive, an id is repeated, or any load has a non-positive
/// current or power, a zero quantity or an out-of-range rule override.
pub fn calculate_diversity(
    circuits: &[CircuitLoad],
    supply: &Supply,
) -> Result<DiversityResult, DiversityError> {
    validate(circuits, supply)?;

    let breakdown: Vec<TypeBreakdown> = group_circuits(circuits)
        .into_iter()
        .map(|group| group.evaluate())
        .collect();

    let result = DiversityResult::from_breakdown(breakdown, *supply);
    info!(
        circuits = circuits.len(),
        groups = result.breakdown_by_type.len(),
        installed_a = result.total_design_current_a,
        diversified_a = result.diversified_current_a,
        factor = result.overall_diversity_factor,
        "diversity calculated"
    );
    Ok(result)
}

fn validate(circuits: &[CircuitLoad], supply: &Supply) -> Result<(), DiversityError> {
    if circuits.is_empty() {
        return Err(DiversityError::EmptyCircuitList);
    }
    check_supply(supply)?;

    for (i, c) in circuits.iter().enumerate() {
        if !(c.design_current_a.is_finite() && c.design_current_a > 0.0) {
            return Err(DiversityError::NonPositiveCurrent {
                id: c.id.clone(),
                value: c.design_current_a,
            });
        }
        if !(c.installed_power_kw.is_finite() && c.installed_power_kw > 0.0) {
            return Err(DiversityError::NonPositivePower {
                id: c.id.clone(),
                value: c.installed_power_kw,
            });
        }
        if c.quantity < 1 {
            return Err(DiversityError::InvalidQuantity {
                id: c.id.clone(),
                quantity: c.quantity,
            });
        }
        if let Some(rule) = &c.rule_override {
            rule.validate().map_err(|reason| DiversityError::InvalidRule {
                id: c.id.clone(),
                reason,
            })?;
        }
        if circuits[..i].iter().any(|earlier| earlier.id == c.id) {
            return Err(DiversityError::DuplicateId(c.id.clone()));
        }
    }
    Ok(())
}

/// Loads sharing everything that affects how their rule evaluates.
struct LoadGroup<'a> {
    load_type: LoadType,
    location: Location,
    rule: DiversityRule,
    overridden: bool,
    has_cooker_socket: bool,
    thermostatically_controlled: bool,
    members: Vec<&'a CircuitLoad>,
}

impl LoadGroup<'_> {
    fn accepts(&self, c: &CircuitLoad, rule: &DiversityRule) -> bool {
        self.location == c.location
            && self.rule == *rule
            && self.overridden == c.rule_override.is_some()
            && self.has_cooker_socket == c.has_cooker_socket
            && self.thermostatically_controlled == c.thermostatically_controlled
    }

    fn input(&self) -> GroupInput {
        GroupInput {
            installed_current_a: self.members.iter().map(|c| c.design_current_a).sum(),
            quantity: self.members.iter().map(|c| c.quantity).sum(),
            largest_unit_current_a: self
                .members
                .iter()
                .map(|c| c.unit_current_a())
                .fold(0.0, f64::max),
            has_cooker_socket: self.has_cooker_socket,
            thermostatically_controlled: self.thermostatically_controlled,
        }
    }

    fn display_name(&self) -> String {
        let name = self.load_type.display_name();
        if self.overridden {
            format!("{name}: {}", self.rule.describe())
        } else {
            name.to_string()
        }
    }

    fn evaluate(self) -> TypeBreakdown {
        let input = self.input();
        let outcome = self.rule.apply(&input);
        let installed_load_kw: f64 = self.members.iter().map(|c| c.installed_power_kw).sum();
        let factor = ratio_or_zero(outcome.diversified_current_a, input.installed_current_a);

        debug!(
            load_type = %self.load_type,
            location = %self.location,
            formula = %outcome.formula,
            "evaluated load group"
        );

        TypeBreakdown {
            load_type: self.load_type,
            location: self.location,
            display_name: self.display_name(),
            count: self.members.len(),
            quantity: input.quantity,
            installed_current_a: input.installed_current_a,
            installed_load_kw,
            diversified_current_a: outcome.diversified_current_a,
            diversified_load_kw: installed_load_kw * factor,
            diversity_factor: factor,
            rule: self.rule,
            formula: outcome.formula,
            regulation: if self.overridden {
                override_citation(self.location)
            } else {
                citation(self.load_type, self.location)
            },
            steps: outcome.steps,
            socket_adder_a: outcome.socket_adder_a,
            thermostatic: outcome.thermostatic,
            circuit_ids: self.members.iter().map(|c| c.id.clone()).collect(),
        }
    }
}

fn group_circuits(circuits: &[CircuitLoad]) -> Vec<LoadGroup<'_>> {
    let mut groups = Vec::new();

    for load_type in LoadType::iter() {
        let mut of_type: Vec<LoadGroup<'_>> = Vec::new();
        for c in circuits.iter().filter(|c| c.load_type == load_type) {
            let rule = c
                .rule_override
                .unwrap_or_else(|| default_rule(load_type, c.location));
            match of_type.iter().position(|g| g.accepts(c, &rule)) {
                Some(i) => of_type[i].members.push(c),
                None => of_type.push(LoadGroup {
                    load_type,
                    location: c.location,
                    rule,
                    overridden: c.rule_override.is_some(),
                    has_cooker_socket: c.has_cooker_socket,
                    thermostatically_controlled: c.thermostatically_controlled,
                    members: vec![c],
                }),
            }
        }
        groups.extend(of_type);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn amps(id: &str, load_type: LoadType, current_a: f64) -> CircuitLoad {
        CircuitLoad::new(
            id,
            load_type,
            current_a,
            current_a * 0.23,
            Location::Domestic,
        )
    }

    fn supply() -> Supply {
        Supply::single_phase(230.0)
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(
            calculate_diversity(&[], &supply()),
            Err(DiversityError::EmptyCircuitList)
        );
    }

    #[test]
    fn zero_voltage_is_rejected() {
        let loads = [amps("l", LoadType::Lighting, 10.0)];
        assert_eq!(
            calculate_diversity(&loads, &Supply::single_phase(0.0)),
            Err(DiversityError::InvalidVoltage(0.0))
        );
    }

    #[test]
    fn non_positive_current_is_rejected() {
        let loads = [amps("l", LoadType::Lighting, 0.0)];
        assert!(matches!(
            calculate_diversity(&loads, &supply()),
            Err(DiversityError::NonPositiveCurrent { .. })
        ));
    }

    #[test]
    fn non_positive_power_is_rejected() {
        let mut load = amps("l", LoadType::Lighting, 10.0);
        load.installed_power_kw = -1.0;
        assert!(matches!(
            calculate_diversity(&[load], &supply()),
            Err(DiversityError::NonPositivePower { .. })
        ));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let load = amps("m", LoadType::Motor, 10.0).with_quantity(0);
        assert_eq!(
            calculate_diversity(&[load], &supply()),
            Err(DiversityError::InvalidQuantity {
                id: "m".to_string(),
                quantity: 0
            })
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let loads = [
            amps("x", LoadType::Lighting, 5.0),
            amps("x", LoadType::Cooker, 30.0),
        ];
        assert_eq!(
            calculate_diversity(&loads, &supply()),
            Err(DiversityError::DuplicateId("x".to_string()))
        );
    }

    #[test]
    fn override_factor_above_one_is_rejected() {
        let load = amps("l", LoadType::Lighting, 10.0)
            .with_rule_override(Some(DiversityRule::FlatPercent { factor: 5.0 }));
        assert!(matches!(
            calculate_diversity(&[load], &supply()),
            Err(DiversityError::InvalidRule { ref id, .. }) if id == "l"
        ));
    }

    #[test]
    fn negative_override_factor_is_rejected() {
        let load = amps("l", LoadType::Lighting, 10.0)
            .with_rule_override(Some(DiversityRule::FlatPercent { factor: -0.5 }));
        assert!(matches!(
            calculate_diversity(&[load], &supply()),
            Err(DiversityError::InvalidRule { .. })
        ));
    }

    #[test]
    fn negative_override_threshold_is_rejected() {
        let load = amps("c", LoadType::Cooker, 30.0).with_rule_override(Some(
            DiversityRule::TieredThreshold {
                threshold_a: -10.0,
                remainder_factor: 0.3,
                socket_adder_a: Some(5.0),
            },
        ));
        let err = calculate_diversity(&[load], &supply()).unwrap_err();
        assert!(err.to_string().contains("threshold_a"), "{err}");
    }

    #[test]
    fn in_range_override_is_accepted() {
        let load = amps("m", LoadType::Motor, 20.0).with_rule_override(Some(
            DiversityRule::MotorGroup {
                single_factor: 1.0,
                group_factor: 0.0,
            },
        ));
        let result = calculate_diversity(&[load], &supply()).unwrap();
        assert_eq!(result.diversified_current_a, 20.0);
    }

    #[test]
    fn same_type_entries_aggregate_before_threshold() {
        let loads = [
            amps("ring-1", LoadType::SocketOutlet, 10.0),
            amps("ring-2", LoadType::SocketOutlet, 14.0),
        ];
        let result = calculate_diversity(&loads, &supply()).unwrap();
        assert_eq!(result.breakdown_by_type.len(), 1);
        let sockets = &result.breakdown_by_type[0];
        assert_eq!(sockets.count, 2);
        assert_eq!(sockets.diversified_current_a, 17.0);
        assert_eq!(sockets.circuit_ids, vec!["ring-1", "ring-2"]);
    }

    #[test]
    fn breakdown_uses_canonical_type_order() {
        let loads = [
            amps("motor", LoadType::Motor, 8.0),
            amps("cooker", LoadType::Cooker, 30.0),
            amps("lights", LoadType::Lighting, 5.0),
        ];
        let result = calculate_diversity(&loads, &supply()).unwrap();
        let order: Vec<LoadType> = result
            .breakdown_by_type
            .iter()
            .map(|g| g.load_type)
            .collect();
        assert_eq!(
            order,
            vec![LoadType::Lighting, LoadType::Cooker, LoadType::Motor]
        );
    }

    #[test]
    fn override_splits_group_and_cites_sub_category() {
        let loads = [
            amps("general", LoadType::Lighting, 10.0),
            amps("emergency", LoadType::Lighting, 2.0)
                .with_rule_override(Some(DiversityRule::NoDiversity)),
        ];
        let result = calculate_diversity(&loads, &supply()).unwrap();
        assert_eq!(result.breakdown_by_type.len(), 2);
        let emergency = &result.breakdown_by_type[1];
        assert_eq!(emergency.diversified_current_a, emergency.installed_current_a);
        assert_eq!(emergency.display_name, "Lighting: no diversity (100%)");
        assert!(emergency.regulation.contains("sub-category"));
    }

    #[test]
    fn cooker_socket_flag_splits_groups() {
        let loads = [
            amps("c1", LoadType::Cooker, 30.0).with_cooker_socket(true),
            amps("c2", LoadType::Cooker, 30.0),
        ];
        let result = calculate_diversity(&loads, &supply()).unwrap();
        assert_eq!(result.breakdown_by_type.len(), 2);
        assert_relative_eq!(
            result.breakdown_by_type[0].diversified_current_a,
            21.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            result.breakdown_by_type[1].diversified_current_a,
            16.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn heating_uses_largest_unit_approximation() {
        // 3 heaters at 8 A each plus one 12 A heater
        let loads = [
            amps("panels", LoadType::SpaceHeating, 24.0).with_quantity(3),
            amps("lounge", LoadType::SpaceHeating, 12.0),
        ];
        let result = calculate_diversity(&loads, &supply()).unwrap();
        let heating = &result.breakdown_by_type[0];
        assert_eq!(heating.quantity, 4);
        // 12 + 24 × 0.75
        assert_relative_eq!(heating.diversified_current_a, 30.0, epsilon = 1e-9);
        assert_eq!(heating.formula, "12A @ 100% + 24A @ 75% = 30A");
    }

    #[test]
    fn diversified_load_scales_with_group_factor() {
        let loads = [amps("lights", LoadType::Lighting, 10.0)];
        let result = calculate_diversity(&loads, &supply()).unwrap();
        assert_relative_eq!(result.diversified_load_kw, 2.3 * 0.66, epsilon = 1e-9);
        assert_relative_eq!(
            result.load_derived_current_a,
            result.diversified_current_a,
            epsilon = 1e-9
        );
    }

    #[test]
    fn commercial_location_uses_table_h2() {
        let mut load = amps("office", LoadType::Lighting, 20.0);
        load.location = Location::Commercial;
        let result = calculate_diversity(&[load], &supply()).unwrap();
        let lighting = &result.breakdown_by_type[0];
        assert_relative_eq!(lighting.diversified_current_a, 18.0, epsilon = 1e-9);
        assert!(lighting.regulation.contains("Table H2"));
        assert!(
            result
                .compliance_notes
                .iter()
                .any(|n| n.contains("Table H2"))
        );
    }
}
