//! Error types for calculations, conversions and schedule edits.

use thiserror::Error;

/// Rejection raised for caller errors in a diversity calculation or unit conversion.
///
/// Invalid input is never clamped or defaulted: either a complete result is
/// produced or one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiversityError {
    #[error("at least one circuit load is required")]
    EmptyCircuitList,
    #[error("supply voltage must be a positive finite number of volts, got {0}")]
    InvalidVoltage(f64),
    #[error("power factor must be in (0, 1], got {0}")]
    InvalidPowerFactor(f64),
    #[error("circuit `{id}`: design current must be > 0 A, got {value}")]
    NonPositiveCurrent { id: String, value: f64 },
    #[error("circuit `{id}`: installed power must be > 0 kW, got {value}")]
    NonPositivePower { id: String, value: f64 },
    #[error("circuit `{id}`: quantity must be >= 1, got {quantity}")]
    InvalidQuantity { id: String, quantity: u32 },
    #[error("circuit `{id}`: invalid rule override: {reason}")]
    InvalidRule { id: String, reason: String },
    #[error("circuit id `{0}` appears more than once in the request")]
    DuplicateId(String),
    #[error("{quantity} must be a non-negative finite number, got {value}")]
    InvalidMagnitude { quantity: &'static str, value: f64 },
    #[error("unknown load type `{0}`")]
    UnknownLoadType(String),
    #[error("unknown installation location `{0}`")]
    UnknownLocation(String),
}

/// Errors raised while editing or recomputing a [`crate::session::LoadSchedule`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("no load row with id `{0}`")]
    UnknownRow(String),
    #[error(transparent)]
    Calculation(#[from] DiversityError),
}
