//! Caller-owned, editable list of raw load rows.
//!
//! Rows hold what a user enters (a per-unit value in amps or kW, a power
//! factor, a sub-category). [`LoadSchedule::to_circuits`] converts them into
//! the engine's [`CircuitLoad`] shape; the engine itself keeps no state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversion::{current_a, power_kw};
use crate::diversity::{DiversityResult, calculate_diversity};
use crate::errors::{DiversityError, SessionError};
use crate::loads::{CircuitLoad, LoadCategory, Location, Supply};

/// Unit of a row's entered value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputUnit {
    #[default]
    Amps,
    Kilowatts,
}

/// One load as entered, before unit conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRow {
    /// Assigned by [`LoadSchedule::add`].
    pub id: String,
    pub category: LoadCategory,
    /// Per-unit value in `unit`.
    pub value: f64,
    pub unit: InputUnit,
    pub power_factor: f64,
    pub quantity: u32,
    pub has_cooker_socket: bool,
    pub thermostatically_controlled: bool,
}

impl LoadRow {
    /// Creates a single-unit row at unity power factor.
    pub fn new(category: LoadCategory, value: f64, unit: InputUnit) -> Self {
        Self {
            id: String::new(),
            category,
            value,
            unit,
            power_factor: 1.0,
            quantity: 1,
            has_cooker_socket: false,
            thermostatically_controlled: false,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_power_factor(mut self, power_factor: f64) -> Self {
        self.power_factor = power_factor;
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

    /// Converts the row into an engine input at `supply` and `location`.
    ///
    /// # Errors
    ///
    /// Fails when the quantity is zero, the power factor or supply are invalid, or the value is
    /// negative.
    pub fn to_circuit(
        &self,
        supply: &Supply,
        location: Location,
    ) -> Result<CircuitLoad, DiversityError> {
        if self.quantity < 1 {
            return Err(DiversityError::InvalidQuantity {
                id: self.id.clone(),
                quantity: self.quantity,
            });
        }
        let (unit_current_a, unit_power_kw) = match self.unit {
            InputUnit::Amps => (self.value, power_kw(self.value, supply, self.power_factor)?),
            InputUnit::Kilowatts => (current_a(self.value, supply, self.power_factor)?, self.value),
        };
        let quantity = f64::from(self.quantity);

        Ok(CircuitLoad {
            id: self.id.clone(),
            load_type: self.category.load_type(),
            design_current_a: unit_current_a * quantity,
            installed_power_kw: unit_power_kw * quantity,
            quantity: self.quantity,
            location,
            has_cooker_socket: self.has_cooker_socket,
            thermostatically_controlled: self.thermostatically_controlled,
            rule_override: self.category.rule_override(),
        })
    }
}

/// A single editable field of a [`LoadRow`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadField {
    Category(LoadCategory),
    Value(f64),
    Unit(InputUnit),
    PowerFactor(f64),
    Quantity(u32),
    CookerSocket(bool),
    Thermostatic(bool),
}

/// Editable load schedule for one installation.
#[derive(Debug, Clone)]
pub struct LoadSchedule {
    location: Location,
    supply: Supply,
    rows: Vec<LoadRow>,
    next_id: u64,
}

impl LoadSchedule {
    pub fn new(location: Location, supply: Supply) -> Self {
        Self {
            location,
            supply,
            rows: Vec::new(),
            next_id: 1,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn supply(&self) -> &Supply {
        &self.supply
    }

    pub fn rows(&self) -> &[LoadRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn set_supply(&mut self, supply: Supply) {
        self.supply = supply;
    }

    /// Appends a row, assigning it a fresh id which is returned.
    pub fn add(&mut self, mut row: LoadRow) -> String {
        row.id = format!("load-{}", self.next_id);
        self.next_id += 1;
        let id = row.id.clone();
        self.rows.push(row);
        id
    }

    /// Removes the row with `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownRow`] if no such row exists.
    pub fn remove(&mut self, id: &str) -> Result<LoadRow, SessionError> {
        let index = self.index_of(id)?;
        Ok(self.rows.remove(index))
    }

    /// Changes one field of the row with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownRow`] if no such row exists.
    pub fn update(&mut self, id: &str, field: LoadField) -> Result<(), SessionError> {
        let index = self.index_of(id)?;
        let row = &mut self.rows[index];
        match field {
            LoadField::Category(category) => row.category = category,
            LoadField::Value(value) => row.value = value,
            LoadField::Unit(unit) => row.unit = unit,
            LoadField::PowerFactor(pf) => row.power_factor = pf,
            LoadField::Quantity(quantity) => row.quantity = quantity,
            LoadField::CookerSocket(flag) => row.has_cooker_socket = flag,
            LoadField::Thermostatic(flag) => row.thermostatically_controlled = flag,
        }
        debug!(id, ?field, "load row updated");
        Ok(())
    }

    /// Converts every row into engine input, in row order.
    ///
    /// # Errors
    ///
    /// Propagates the first conversion failure.
    pub fn to_circuits(&self) -> Result<Vec<CircuitLoad>, DiversityError> {
        self.rows
            .iter()
            .map(|row| row.to_circuit(&self.supply, self.location))
            .collect()
    }

    /// Converts the current rows and runs the engine on them.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Calculation`] when conversion or the engine rejects the input.
    pub fn recompute(&self) -> Result<DiversityResult, SessionError> {
        let circuits = self.to_circuits()?;
        Ok(calculate_diversity(&circuits, &self.supply)?)
    }

    fn index_of(&self, id: &str) -> Result<usize, SessionError> {
        self.rows
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| SessionError::UnknownRow(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadType;
    use approx::assert_relative_eq;

    fn domestic() -> LoadSchedule {
        LoadSchedule::new(Location::Domestic, Supply::single_phase(230.0))
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let mut schedule = domestic();
        let a = schedule.add(LoadRow::new(LoadCategory::LedLighting, 5.0, InputUnit::Amps));
        let b = schedule.add(LoadRow::new(LoadCategory::Hob, 20.0, InputUnit::Amps));
        assert_eq!(a, "load-1");
        assert_eq!(b, "load-2");
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_remove() {
        let mut schedule = domestic();
        let a = schedule.add(LoadRow::new(LoadCategory::LedLighting, 5.0, InputUnit::Amps));
        schedule.remove(&a).unwrap();
        let b = schedule.add(LoadRow::new(LoadCategory::LedLighting, 5.0, InputUnit::Amps));
        assert_ne!(a, b);
        assert!(schedule.remove(&a).is_err());
    }

    #[test]
    fn update_unknown_row_fails() {
        let mut schedule = domestic();
        assert_eq!(
            schedule.update("load-9", LoadField::Value(3.0)),
            Err(SessionError::UnknownRow("load-9".to_string()))
        );
    }

    #[test]
    fn kilowatt_rows_convert_to_current() {
        let row = LoadRow::new(LoadCategory::PanelHeaters, 2.3, InputUnit::Kilowatts)
            .with_quantity(3);
        let circuit = row
            .to_circuit(&Supply::single_phase(230.0), Location::Domestic)
            .unwrap();
        assert_eq!(circuit.load_type, LoadType::SpaceHeating);
        assert_relative_eq!(circuit.design_current_a, 30.0, epsilon = 1e-9);
        assert_relative_eq!(circuit.installed_power_kw, 6.9, epsilon = 1e-9);
        assert_eq!(circuit.quantity, 3);
    }

    #[test]
    fn amp_rows_use_power_factor() {
        let row = LoadRow::new(LoadCategory::SingleMotor, 10.0, InputUnit::Amps)
            .with_power_factor(0.8);
        let circuit = row
            .to_circuit(&Supply::single_phase(230.0), Location::Industrial)
            .unwrap();
        assert_relative_eq!(circuit.installed_power_kw, 1.84, epsilon = 1e-9);
        assert_eq!(circuit.location, Location::Industrial);
    }

    #[test]
    fn recompute_follows_edits() {
        let mut schedule = domestic();
        let cooker = schedule.add(LoadRow::new(
            LoadCategory::ElectricCooker,
            30.0,
            InputUnit::Amps,
        ));
        let before = schedule.recompute().unwrap();
        assert_relative_eq!(before.diversified_current_a, 16.0, epsilon = 1e-9);

        schedule
            .update(&cooker, LoadField::CookerSocket(true))
            .unwrap();
        let after = schedule.recompute().unwrap();
        assert_relative_eq!(after.diversified_current_a, 21.0, epsilon = 1e-9);
    }

    #[test]
    fn recompute_of_empty_schedule_is_an_error() {
        assert_eq!(
            domestic().recompute().unwrap_err(),
            SessionError::Calculation(DiversityError::EmptyCircuitList)
        );
    }

    #[test]
    fn zero_value_row_is_rejected_by_engine() {
        let mut schedule = domestic();
        schedule.add(LoadRow::new(LoadCategory::Oven, 0.0, InputUnit::Amps));
        assert!(matches!(
            schedule.recompute(),
            Err(SessionError::Calculation(
                DiversityError::NonPositiveCurrent { .. }
            ))
        ));
    }

    #[test]
    fn zero_quantity_is_reported_as_quantity() {
        let mut schedule = domestic();
        let oven = schedule.add(LoadRow::new(LoadCategory::Oven, 13.0, InputUnit::Amps));
        schedule.update(&oven, LoadField::Quantity(0)).unwrap();
        assert!(matches!(
            schedule.recompute(),
            Err(SessionError::Calculation(DiversityError::InvalidQuantity {
                quantity: 0,
                ..
            }))
        ));
    }

    #[test]
    fn category_override_travels_with_row() {
        let mut schedule = domestic();
        schedule.add(LoadRow::new(
            LoadCategory::EmergencyLighting,
            2.0,
            InputUnit::Amps,
        ));
        let circuits = schedule.to_circuits().unwrap();
        assert!(circuits[0].rule_override.is_some());
    }
}
