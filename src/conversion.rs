//! Power ↔ line current conversion at a given supply.
//!
//! - Single-phase: `P = V × I × PF / 1000`
//! - Three-phase: `P = √3 × V × I × PF / 1000` (`V` line-to-line)
//!
//! The engine never converts on its own; callers produce both
//! `design_current_a` and `installed_power_kw` through these functions.

use crate::errors::DiversityError;
use crate::loads::{Supply, SupplyType};

/// Converts line current to real power.
///
/// # Examples
///
/// ```
/// use load_diversity::conversion::power_kw;
/// use load_diversity::loads::Supply;
///
/// let kw = power_kw(10.0, &Supply::single_phase(230.0), 1.0).unwrap();
/// assert!((kw - 2.3).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// Rejects a non-positive voltage, a power factor outside `(0, 1]` and a
/// negative or non-finite current.
pub fn power_kw(current_a: f64, supply: &Supply, power_factor: f64) -> Result<f64, DiversityError> {
    check_supply(supply)?;
    check_power_factor(power_factor)?;
    check_magnitude("current", current_a)?;
    Ok(phase_multiplier(supply.phase) * supply.voltage_v * current_a * power_factor / 1000.0)
}

/// Converts real power to line current.
///
/// # Errors
///
/// Same conditions as [`power_kw`], applied to `power_kw`.
pub fn current_a(power_kw: f64, supply: &Supply, power_factor: f64) -> Result<f64, DiversityError> {
    check_supply(supply)?;
    check_power_factor(power_factor)?;
    check_magnitude("power", power_kw)?;
    Ok(line_current_a(power_kw, supply, power_factor))
}

/// Line current drawn by an aggregate load at unity power factor.
///
/// # Errors
///
/// Rejects a non-positive voltage or a negative load.
pub fn load_to_current(power_kw: f64, supply: &Supply) -> Result<f64, DiversityError> {
    current_a(power_kw, supply, 1.0)
}

/// Unchecked inverse conversion; returns 0 for a degenerate supply.
pub(crate) fn line_current_a(power_kw: f64, supply: &Supply, power_factor: f64) -> f64 {
    let denominator = phase_multiplier(supply.phase) * supply.voltage_v * power_factor;
    if denominator > 0.0 {
        power_kw * 1000.0 / denominator
    } else {
        0.0
    }
}

fn phase_multiplier(phase: SupplyType) -> f64 {
    match phase {
        SupplyType::SinglePhase => 1.0,
        SupplyType::ThreePhase => 3.0_f64.sqrt(),
    }
}

pub(crate) fn check_supply(supply: &Supply) -> Result<(), DiversityError> {
    if supply.voltage_v.is_finite() && supply.voltage_v > 0.0 {
        Ok(())
    } else {
        Err(DiversityError::InvalidVoltage(supply.voltage_v))
    }
}

fn check_power_factor(power_factor: f64) -> Result<(), DiversityError> {
    if power_factor > 0.0 && power_factor <= 1.0 {
        Ok(())
    } else {
        Err(DiversityError::InvalidPowerFactor(power_factor))
    }
}

fn check_magnitude(quantity: &'static str, value: f64) -> Result<(), DiversityError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DiversityError::InvalidMagnitude { quantity, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_phase_round_trip() {
        let supply = Supply::single_phase(230.0);
        let kw = power_kw(32.0, &supply, 0.95).unwrap();
        assert_relative_eq!(kw, 230.0 * 32.0 * 0.95 / 1000.0, epsilon = 1e-12);
        let amps = current_a(kw, &supply, 0.95).unwrap();
        assert_relative_eq!(amps, 32.0, epsilon = 1e-9);
    }

    #[test]
    fn three_phase_includes_root_three() {
        let supply = Supply::three_phase(400.0);
        let amps = load_to_current(10.0, &supply).unwrap();
        assert_relative_eq!(amps, 10_000.0 / (3.0_f64.sqrt() * 400.0), epsilon = 1e-9);
    }

    #[test]
    fn rejects_non_positive_voltage() {
        let supply = Supply::single_phase(0.0);
        assert_eq!(
            power_kw(10.0, &supply, 1.0),
            Err(DiversityError::InvalidVoltage(0.0))
        );
        assert!(current_a(1.0, &Supply::single_phase(-230.0), 1.0).is_err());
    }

    #[test]
    fn rejects_power_factor_out_of_range() {
        let supply = Supply::default();
        assert_eq!(
            power_kw(10.0, &supply, 1.2),
            Err(DiversityError::InvalidPowerFactor(1.2))
        );
        assert!(power_kw(10.0, &supply, 0.0).is_err());
    }

    #[test]
    fn rejects_negative_or_nan_magnitudes() {
        let supply = Supply::default();
        assert!(power_kw(-1.0, &supply, 1.0).is_err());
        assert!(current_a(f64::NAN, &supply, 1.0).is_err());
    }

    #[test]
    fn unchecked_current_guards_zero_voltage() {
        let supply = Supply::single_phase(0.0);
        assert_eq!(line_current_a(5.0, &supply, 1.0), 0.0);
    }
}
