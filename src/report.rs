//! Plain-text rendering of calculation results.

use std::fmt;

use crate::diversity::{DiversityResult, TypeBreakdown};
use crate::loads::SupplyType;
use crate::rules::{RuleTable, fmt_pct};

impl fmt::Display for TypeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} [{} circuit(s), {} unit(s)]",
            self.display_name, self.count, self.quantity
        )?;
        writeln!(f, "  Regulation:  {}", self.regulation)?;
        writeln!(
            f,
            "  Installed:   {:.2} A / {:.2} kW",
            self.installed_current_a, self.installed_load_kw
        )?;
        writeln!(
            f,
            "  Diversified: {:.2} A / {:.2} kW (factor {:.3})",
            self.diversified_current_a, self.diversified_load_kw, self.diversity_factor
        )?;
        writeln!(f, "  Formula:     {}", self.formula)?;
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "    {}. {step}", i + 1)?;
        }
        write!(f, "  Circuits:    {}", self.circuit_ids.join(", "))
    }
}

impl fmt::Display for DiversityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.supply.phase {
            SupplyType::SinglePhase => "single-phase",
            SupplyType::ThreePhase => "three-phase",
        };
        writeln!(f, "--- Maximum Demand Report ---")?;
        writeln!(f, "Supply:                {:.0} V {phase}", self.supply.voltage_v)?;
        writeln!(f)?;
        for group in &self.breakdown_by_type {
            writeln!(f, "{group}")?;
            writeln!(f)?;
        }
        writeln!(f, "Installed load:        {:.2} kW", self.total_installed_load_kw)?;
        writeln!(f, "Design current:        {:.2} A", self.total_design_current_a)?;
        writeln!(f, "Diversified load:      {:.2} kW", self.diversified_load_kw)?;
        writeln!(f, "Diversified current:   {:.2} A", self.diversified_current_a)?;
        writeln!(f, "Load-derived current:  {:.2} A", self.load_derived_current_a)?;
        writeln!(
            f,
            "Overall diversity:     {:.3} ({}%)",
            self.overall_diversity_factor,
            fmt_pct(self.overall_diversity_factor)
        )?;
        writeln!(f)?;
        writeln!(f, "Notes:")?;
        for note in &self.compliance_notes {
            writeln!(f, "  - {note}")?;
        }
        Ok(())
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Diversity Rules ({}) ---", self.location)?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:<20} {:<55} {}",
                entry.load_type.display_name(),
                entry.description,
                entry.regulation
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::diversity::calculate_diversity;
    use crate::loads::{CircuitLoad, LoadType, Location, Supply};
    use crate::rules::RuleTable;

    #[test]
    fn report_contains_headline_lines() {
        let circuits = vec![
            CircuitLoad::new("l1", LoadType::Lighting, 10.0, 2.3, Location::Domestic),
            CircuitLoad::new("c1", LoadType::Cooker, 30.0, 6.9, Location::Domestic),
        ];
        let result = calculate_diversity(&circuits, &Supply::single_phase(230.0)).unwrap();
        let text = result.to_string();

        assert!(text.contains("Diversified current:   22.60 A"));
        assert!(text.contains("Design current:        40.00 A"));
        assert!(text.contains("Supply:                230 V single-phase"));
        assert!(text.contains("10A @ 100% + 20A @ 30% = 16A"));
        assert!(text.contains("Notes:"));
    }

    #[test]
    fn breakdown_lists_steps_in_order() {
        let circuits = vec![CircuitLoad::new(
            "s1",
            LoadType::SocketOutlet,
            24.0,
            5.52,
            Location::Domestic,
        )];
        let result = calculate_diversity(&circuits, &Supply::default()).unwrap();
        let text = result.breakdown_by_type[0].to_string();
        assert!(text.contains("    1. "));
        assert!(text.contains("Circuits:    s1"));
    }

    #[test]
    fn rule_table_renders_every_type() {
        let text = RuleTable::for_location(Location::Commercial).to_string();
        assert!(text.contains("(commercial)"));
        for name in ["Lighting", "Socket Outlets", "Motors", "Small Power"] {
            assert!(text.contains(name), "missing {name}");
        }
    }
}
