//! Routing-service trip response model.
//!
//! Only the fields the route pipeline reads are modelled; everything else in
//! the payload is ignored here and kept verbatim by `RouteResult`.

use serde::Deserialize;
use serde_json::Value;

use crate::route::RouteError;

#[derive(Debug, Clone, Deserialize)]
pub struct TripResponse {
    pub trip: Trip,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    pub legs: Vec<TripLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripLeg {
    /// Precision-6 encoded polyline, latitude first.
    pub shape: String,
    pub summary: LegSummary,
    /// Passed through untouched.
    pub maneuvers: Vec<Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LegSummary {
    /// Seconds.
    pub time: f64,
    /// Kilometers.
    pub length: f64,
}

impl TripResponse {
    pub fn from_value(raw: &Value) -> Result<Self, RouteError> {
        TripResponse::deserialize(raw).map_err(RouteError::MalformedResponse)
    }
}
