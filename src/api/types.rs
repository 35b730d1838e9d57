//! API request and query types.

use serde::{Deserialize, Serialize};

use crate::loads::{CircuitLoad, Supply};

/// Body of `POST /calculate`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculateRequest {
    /// Falls back to the server's supply when omitted.
    #[serde(default)]
    pub supply: Option<Supply>,
    pub loads: Vec<CircuitLoad>,
}

/// Query parameters for `GET /rules`.
#[derive(Debug, Deserialize)]
pub struct RulesQuery {
    /// `domestic`, `commercial` or `industrial`; defaults to domestic.
    pub location: Option<String>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
