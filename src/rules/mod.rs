//! Diversity rule shapes and their evaluation against a group of loads.

pub mod table;

use serde::{Deserialize, Serialize};

pub use table::{RuleEntry, RuleTable};

/// One diversity allowance shape with its parameters.
///
/// Factors are fractions in `[0, 1]`; thresholds and adders are amperes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DiversityRule {
    /// `diversified = installed × factor`.
    FlatPercent { factor: f64 },
    /// First `threshold_a` at 100%, remainder at `remainder_factor`, plus
    /// `socket_adder_a` when the group has a cooker control unit socket.
    TieredThreshold {
        threshold_a: f64,
        remainder_factor: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        socket_adder_a: Option<f64>,
    },
    /// 100% when thermostatically controlled, otherwise the largest unit at
    /// 100% plus the rest at `remainder_factor`.
    ConditionalFlag { remainder_factor: f64 },
    /// `single_factor` for one motor, `group_factor` for two or more.
    MotorGroup {
        single_factor: f64,
        group_factor: f64,
    },
    NoDiversity,
}

/// Aggregated view of one group of loads sharing a rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupInput {
    /// Sum of the members' design currents (A).
    pub installed_current_a: f64,
    /// Total number of units across the members.
    pub quantity: u32,
    /// Largest per-unit current among the members (A).
    pub largest_unit_current_a: f64,
    pub has_cooker_socket: bool,
    pub thermostatically_controlled: bool,
}

/// Result of applying a rule: the diversified current and how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub diversified_current_a: f64,
    /// One-line derivation, e.g. `10A @ 100% + 14A @ 50% = 17A`.
    pub formula: String,
    /// Ordered "show your working" lines.
    pub steps: Vec<String>,
    /// Cooker control unit allowance included in `diversified_current_a`, if any.
    pub socket_adder_a: Option<f64>,
    /// The thermostatic branch fired and the group was taken at 100%.
    pub thermostatic: bool,
}

impl DiversityRule {
    /// Applies the rule to a group and records the branch that fired.
    pub fn apply(&self, group: &GroupInput) -> RuleOutcome {
        let installed = group.installed_current_a;
        let mut steps = vec![format!(
            "Installed current: {}A across {} unit(s)",
            fmt_num(installed),
            group.quantity
        )];

        match *self {
            DiversityRule::FlatPercent { factor } => {
                let diversified = installed * factor;
                steps.push(format!(
                    "Flat allowance of {}% applied to the installed current",
                    fmt_pct(factor)
                ));
                steps.push(format!(
                    "{}A × {}% = {}A",
                    fmt_num(installed),
                    fmt_pct(factor),
                    fmt_num(diversified)
                ));
                RuleOutcome {
                    diversified_current_a: diversified,
                    formula: term_formula(&[(installed, factor)], None, diversified),
                    steps,
                    socket_adder_a: None,
                    thermostatic: false,
                }
            }
            DiversityRule::TieredThreshold {
                threshold_a,
                remainder_factor,
                socket_adder_a,
            } => {
                let first = installed.min(threshold_a);
                let remainder = (installed - threshold_a).max(0.0);
                let adder = socket_adder_a.filter(|_| group.has_cooker_socket);
                let diversified = first + remainder * remainder_factor + adder.unwrap_or(0.0);

                steps.push(format!(
                    "First {}A at 100% = {}A",
                    fmt_num(threshold_a),
                    fmt_num(first)
                ));
                if remainder > 0.0 {
                    steps.push(format!(
                        "Remainder {}A at {}% = {}A",
                        fmt_num(remainder),
                        fmt_pct(remainder_factor),
                        fmt_num(remainder * remainder_factor)
                    ));
                } else {
                    steps.push(format!(
                        "Installed current does not exceed {}A, no remainder to reduce",
                        fmt_num(threshold_a)
                    ));
                }
                if let Some(adder) = adder {
                    steps.push(format!(
                        "Cooker control unit socket-outlet adds {}A",
                        fmt_num(adder)
                    ));
                }
                steps.push(format!("Diversified current = {}A", fmt_num(diversified)));

                let mut terms = vec![(first, 1.0)];
                if remainder > 0.0 {
                    terms.push((remainder, remainder_factor));
                }
                RuleOutcome {
                    diversified_current_a: diversified,
                    formula: term_formula(&terms, adder, diversified),
                    steps,
                    socket_adder_a: adder,
                    thermostatic: false,
                }
            }
            DiversityRule::ConditionalFlag { remainder_factor } => {
                if group.thermostatically_controlled {
                    steps.push(
                        "Thermostatically controlled: no diversity, taken at 100%".to_string(),
                    );
                    return RuleOutcome {
                        diversified_current_a: installed,
                        formula: format!(
                            "{} (thermostatic) = {}A",
                            term(installed, 1.0),
                            fmt_num(installed)
                        ),
                        steps,
                        socket_adder_a: None,
                        thermostatic: true,
                    };
                }

                // Entries arrive aggregated by quantity, so the largest unit is
                // the largest per-unit current rather than a measured one.
                let largest = group.largest_unit_current_a.clamp(0.0, installed);
                let remainder = installed - largest;
                if group.quantity <= 1 || remainder <= 0.0 {
                    steps.push("Single unit: largest unit taken at 100%".to_string());
                    return RuleOutcome {
                        diversified_current_a: installed,
                        formula: term_formula(&[(installed, 1.0)], None, installed),
                        steps,
                        socket_adder_a: None,
                        thermostatic: false,
                    };
                }

                let diversified = largest + remainder * remainder_factor;
                steps.push(format!("Largest unit {}A at 100%", fmt_num(largest)));
                steps.push(format!(
                    "Remaining {}A at {}% = {}A",
                    fmt_num(remainder),
                    fmt_pct(remainder_factor),
                    fmt_num(remainder * remainder_factor)
                ));
                steps.push(format!("Diversified current = {}A", fmt_num(diversified)));
                RuleOutcome {
                    diversified_current_a: diversified,
                    formula: term_formula(
                        &[(largest, 1.0), (remainder, remainder_factor)],
                        None,
                        diversified,
                    ),
                    steps,
                    socket_adder_a: None,
                    thermostatic: false,
                }
            }
            DiversityRule::MotorGroup {
                single_factor,
                group_factor,
            } => {
                let factor = if group.quantity <= 1 {
                    steps.push(format!("Single motor: {}%", fmt_pct(single_factor)));
                    single_factor
                } else {
                    steps.push(format!(
                        "Group of {} motors: {}%",
                        group.quantity,
                        fmt_pct(group_factor)
                    ));
                    group_factor
                };
                let diversified = installed * factor;
                steps.push(format!(
                    "{}A × {}% = {}A",
                    fmt_num(installed),
                    fmt_pct(factor),
                    fmt_num(diversified)
                ));
                RuleOutcome {
                    diversified_current_a: diversified,
                    formula: term_formula(&[(installed, factor)], None, diversified),
                    steps,
                    socket_adder_a: None,
                    thermostatic: false,
                }
            }
            DiversityRule::NoDiversity => {
                steps.push("No diversity allowance: taken at 100%".to_string());
                RuleOutcome {
                    diversified_current_a: installed,
                    formula: term_formula(&[(installed, 1.0)], None, installed),
                    steps,
                    socket_adder_a: None,
                    thermostatic: false,
                }
            }
        }
    }

    /// Checks that every parameter is usable: factors are fractions in
    /// `[0, 1]`, thresholds and adders are non-negative amperes.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending parameter.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            DiversityRule::FlatPercent { factor } => check_factor("factor", factor),
            DiversityRule::TieredThreshold {
                threshold_a,
                remainder_factor,
                socket_adder_a,
            } => {
                check_amps("threshold_a", threshold_a)?;
                check_factor("remainder_factor", remainder_factor)?;
                socket_adder_a.map_or(Ok(()), |a| check_amps("socket_adder_a", a))
            }
            DiversityRule::ConditionalFlag { remainder_factor } => {
                check_factor("remainder_factor", remainder_factor)
            }
            DiversityRule::MotorGroup {
                single_factor,
                group_factor,
            } => {
                check_factor("single_factor", single_factor)?;
                check_factor("group_factor", group_factor)
            }
            DiversityRule::NoDiversity => Ok(()),
        }
    }

    /// Short description of the allowance, e.g. `first 10A at 100%, remainder at 50%`.
    pub fn describe(&self) -> String {
        match *self {
            DiversityRule::FlatPercent { factor } => {
                format!("{}% of installed current", fmt_pct(factor))
            }
            DiversityRule::TieredThreshold {
                threshold_a,
                remainder_factor,
                socket_adder_a,
            } => {
                let base = format!(
                    "first {}A at 100%, remainder at {}%",
                    fmt_num(threshold_a),
                    fmt_pct(remainder_factor)
                );
                match socket_adder_a {
                    Some(adder) => format!("{base}, +{}A with cooker socket", fmt_num(adder)),
                    None => base,
                }
            }
            DiversityRule::ConditionalFlag { remainder_factor } => format!(
                "100% if thermostatic, else largest at 100% + {}% of remainder",
                fmt_pct(remainder_factor)
            ),
            DiversityRule::MotorGroup {
                single_factor,
                group_factor,
            } => format!(
                "single motor {}%, motor group {}%",
                fmt_pct(single_factor),
                fmt_pct(group_factor)
            ),
            DiversityRule::NoDiversity => "no diversity (100%)".to_string(),
        }
    }
}

fn check_factor(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{name} must be in [0, 1], got {value}"))
    }
}

fn check_amps(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be a non-negative number of amps, got {value}"))
    }
}

fn term(current_a: f64, factor: f64) -> String {
    format!("{}A @ {}%", fmt_num(current_a), fmt_pct(factor))
}

fn term_formula(terms: &[(f64, f64)], adder_a: Option<f64>, result_a: f64) -> String {
    let mut parts: Vec<String> = terms.iter().map(|&(a, f)| term(a, f)).collect();
    if let Some(adder) = adder_a {
        parts.push(format!("{}A cooker socket", fmt_num(adder)));
    }
    format!("{} = {}A", parts.join(" + "), fmt_num(result_a))
}

/// Formats a value with at most two decimals and no trailing zeros.
pub(crate) fn fmt_num(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Formats a fraction as a percentage number, e.g. `0.66` → `66`.
pub(crate) fn fmt_pct(fraction: f64) -> String {
    fmt_num(fraction * 100.0)
}
