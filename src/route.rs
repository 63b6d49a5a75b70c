//! Route results built from routing-service responses.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use wkt::{ToWkt, TryFromWkt};

use crate::polyline::{self, Polyline, PolylineError};
use crate::response::{TripLeg, TripResponse};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("malformed routing response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("routing response contains no legs")]
    EmptyTrip,

    #[error("invalid shape in leg {leg}: {source}")]
    InvalidShape {
        leg: usize,
        #[source]
        source: PolylineError,
    },
}

#[derive(Debug, Error)]
#[error("invalid WKT point {wkt:?}: {message}")]
pub struct WktPointError {
    pub wkt: String,
    pub message: String,
}

/// A WGS84 waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lon: f64,
    pub lat: f64,
}

impl RoutePoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn to_wkt(&self) -> String {
        geo_types::Point::new(self.lon, self.lat).wkt_string()
    }

    pub fn from_wkt(wkt: &str) -> Result<Self, WktPointError> {
        let point = geo_types::Point::<f64>::try_from_wkt_str(wkt).map_err(|err| WktPointError {
            wkt: wkt.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self::new(point.x(), point.y()))
    }
}

/// One decoded leg between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub geometry: Polyline,
    /// Seconds.
    pub duration: f64,
    /// Kilometers, rounded to 3 decimals.
    pub length: f64,
    pub maneuvers: Vec<Value>,
}

impl RouteLeg {
    fn from_trip_leg(index: usize, leg: TripLeg) -> Result<Self, RouteError> {
        let geometry = polyline::decode6(&leg.shape)
            .map_err(|source| RouteError::InvalidShape { leg: index, source })?;

        Ok(Self {
            geometry,
            duration: leg.summary.time,
            length: round_km(leg.summary.length),
            maneuvers: leg.maneuvers,
        })
    }
}

/// A fully decoded route.
///
/// Totals are derived from the legs when the result is built and never set
/// independently. The raw payload is kept verbatim so the route can be
/// persisted and rebuilt without querying the routing service again.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    raw: Value,
    legs: Vec<RouteLeg>,
    geometry: Polyline,
    duration: f64,
    distance: f64,
}

impl RouteResult {
    /// Decodes every leg of `raw` and aggregates them into one route.
    ///
    /// Leg geometries are concatenated in order without removing the
    /// endpoint shared by consecutive legs. The distance is the sum of the
    /// per-leg lengths after each one is rounded to 3 decimals.
    pub fn from_response(raw: Value) -> Result<Self, RouteError> {
        let response = TripResponse::from_value(&raw)?;
        if response.trip.legs.is_empty() {
            return Err(RouteError::EmptyTrip);
        }

        let legs = response
            .trip
            .legs
            .into_par_iter()
            .enumerate()
            .map(|(index, leg)| RouteLeg::from_trip_leg(index, leg))
            .collect::<Result<Vec<_>, _>>()?;

        let mut geometry = Polyline::default();
        let mut duration = 0.0;
        let mut distance = 0.0;
        for leg in &legs {
            geometry.extend_from(&leg.geometry);
            duration += leg.duration;
            distance += leg.length;
        }

        Ok(Self {
            raw,
            legs,
            geometry,
            duration,
            distance,
        })
    }

    /// The payload this result was built from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }

    pub fn geometry(&self) -> &Polyline {
        &self.geometry
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Total distance in kilometers.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// `HH:MM` label for the total duration.
    pub fn duration_label(&self) -> String {
        format_duration(self.duration)
    }

    pub fn maneuvers(&self, leg: usize) -> Option<&[Value]> {
        self.legs.get(leg).map(|leg| leg.maneuvers.as_slice())
    }

    /// Maneuvers of the first leg whose geometry equals `geometry`.
    ///
    /// Legs with identical geometry (e.g. out and back on the same road)
    /// cannot be told apart here; use [`RouteResult::maneuvers`] instead.
    pub fn maneuvers_for_geometry(&self, geometry: &Polyline) -> Option<&[Value]> {
        self.legs
            .iter()
            .find(|leg| &leg.geometry == geometry)
            .map(|leg| leg.maneuvers.as_slice())
    }
}

/// Formats seconds as zero-padded `HH:MM`, dropping leftover seconds.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 3600, (total % 3600) / 60)
}

fn round_km(km: f64) -> f64 {
    (km * 1000.0).round() / 1000.0
}
