//! Calculation output: per-group breakdown and installation totals.

use serde::Serialize;

use super::notes::compliance_notes;
use crate::conversion::line_current_a;
use crate::loads::{LoadType, Location, Supply};
use crate::rules::DiversityRule;

/// Aggregate for one group of loads evaluated under a single rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeBreakdown {
    #[serde(rename = "type")]
    pub load_type: LoadType,
    pub location: Location,
    pub display_name: String,
    /// Number of input entries aggregated into this group.
    pub count: usize,
    /// Total units across those entries.
    pub quantity: u32,
    pub installed_current_a: f64,
    pub installed_load_kw: f64,
    pub diversified_current_a: f64,
    pub diversified_load_kw: f64,
    /// `diversified_current_a / installed_current_a`.
    pub diversity_factor: f64,
    pub rule: DiversityRule,
    pub formula: String,
    pub regulation: String,
    pub steps: Vec<String>,
    /// Cooker control unit allowance included in the diversified current.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_adder_a: Option<f64>,
    /// Taken at 100% because the heating is thermostatically controlled.
    pub thermostatic: bool,
    /// Ids of the circuits in this group, in input order.
    pub circuit_ids: Vec<String>,
}

/// Diversified maximum demand for a set of circuit loads.
///
/// Built from the breakdown so that totals can never drift from the
/// per-group figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityResult {
    pub supply: Supply,
    /// Undiversified sum of installed power (kW).
    pub total_installed_load_kw: f64,
    /// Undiversified sum of design current (A).
    pub total_design_current_a: f64,
    /// Sum of per-group diversified load (kW).
    pub diversified_load_kw: f64,
    /// Sum of per-group diversified current (A); the headline figure.
    pub diversified_current_a: f64,
    /// Current recomputed from `diversified_load_kw` at the supply voltage
    /// and unity power factor. Equals `diversified_current_a` when every
    /// load was converted at unity power factor.
    pub load_derived_current_a: f64,
    /// `diversified_current_a / total_design_current_a`, or 0 when the total is 0.
    pub overall_diversity_factor: f64,
    pub breakdown_by_type: Vec<TypeBreakdown>,
    pub compliance_notes: Vec<String>,
}

impl DiversityResult {
    /// Sums a breakdown into installation totals.
    ///
    /// An empty breakdown yields all-zero totals and a factor of 0.
    pub fn from_breakdown(breakdown: Vec<TypeBreakdown>, supply: Supply) -> Self {
        let mut total_installed_load_kw = 0.0;
        let mut total_design_current_a = 0.0;
        let mut diversified_load_kw = 0.0;
        let mut diversified_current_a = 0.0;

        for group in &breakdown {
            total_installed_load_kw += group.installed_load_kw;
            total_design_current_a += group.installed_current_a;
            diversified_load_kw += group.diversified_load_kw;
            diversified_current_a += group.diversified_current_a;
        }

        let compliance_notes = compliance_notes(&breakdown);

        Self {
            supply,
            total_installed_load_kw,
            total_design_current_a,
            diversified_load_kw,
            diversified_current_a,
            load_derived_current_a: line_current_a(diversified_load_kw, &supply, 1.0),
            overall_diversity_factor: ratio_or_zero(diversified_current_a, total_design_current_a),
            breakdown_by_type: breakdown,
            compliance_notes,
        }
    }

    /// Looks up the first breakdown entry for a load type.
    pub fn group(&self, load_type: LoadType) -> Option<&TypeBreakdown> {
        self.breakdown_by_type
            .iter()
            .find(|g| g.load_type == load_type)
    }
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
