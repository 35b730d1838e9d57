//! Advisory notes attached to every result.

use super::types::TypeBreakdown;
use crate::loads::Location;
use crate::rules::fmt_num;

const SOURCE_NOTE: &str = "Diversity allowances are taken from the IET On-Site Guide, a companion \
    publication; BS 7671 permits diversity when assessing maximum demand (Regulation 311.1) but \
    does not itself prescribe the allowances.";

const JUDGEMENT_NOTE: &str = "Allowances are guidance only: the designer must still judge the \
    load pattern and simultaneity of use for this installation.";

const FINAL_CIRCUIT_NOTE: &str = "Diversity applies to the supply and distribution circuits; each \
    final circuit must still be rated for its own undiversified design current.";

/// Static notes plus notes triggered by the groups that were evaluated.
pub fn compliance_notes(breakdown: &[TypeBreakdown]) -> Vec<String> {
    let mut notes = vec![
        SOURCE_NOTE.to_string(),
        JUDGEMENT_NOTE.to_string(),
        FINAL_CIRCUIT_NOTE.to_string(),
    ];

    if breakdown.iter().any(|g| g.location != Location::Domestic) {
        notes.push(
            "Commercial and industrial allowances follow Table H2 and should be confirmed \
             against the intended occupancy."
                .to_string(),
        );
    }

    let mut adders: Vec<f64> = Vec::new();
    for adder in breakdown.iter().filter_map(|g| g.socket_adder_a) {
        if !adders.contains(&adder) {
            adders.push(adder);
        }
    }
    for adder in adders {
        notes.push(format!(
            "A {}A allowance is included for the socket-outlet on the cooker control unit.",
            fmt_num(adder)
        ));
    }

    if breakdown.iter().any(|g| g.thermostatic) {
        notes.push(
            "Thermostatically controlled heating is taken at 100%: the thermostat does not \
             reduce peak demand."
                .to_string(),
        );
    }

    notes
}
