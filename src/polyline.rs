//! Polyline representation for route geometries.
//!
//! Shapes arrive from the routing service as encoded polylines (precision 6).
//! Decoding happens once at the boundary; everything downstream works with
//! the decoded coordinate sequence.

use thiserror::Error;

/// Precision used by the routing service for leg shapes.
pub const PRECISION_6: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("failed to decode polyline: {0}")]
    Decode(String),

    #[error("failed to encode polyline: {0}")]
    Encode(String),
}

/// A polyline representing a route geometry as decoded coordinates.
///
/// Points are stored as `(x, y)`, i.e. `(longitude, latitude)`, even though
/// the wire encoding is latitude first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from `(longitude, latitude)` points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends all points of `other`, keeping shared endpoints.
    pub fn extend_from(&mut self, other: &Polyline) {
        self.points.extend_from_slice(&other.points);
    }
}

impl From<&Polyline> for geo_types::LineString<f64> {
    fn from(polyline: &Polyline) -> Self {
        polyline
            .points
            .iter()
            .map(|&(x, y)| geo_types::Coord { x, y })
            .collect()
    }
}

/// Decodes a precision-6 polyline.
pub fn decode6(encoded: &str) -> Result<Polyline, PolylineError> {
    decode(encoded, PRECISION_6)
}

/// Decodes an encoded polyline with the given decimal precision.
pub fn decode(encoded: &str, precision: u32) -> Result<Polyline, PolylineError> {
    let line = ::polyline::decode_polyline(encoded, precision)
        .map_err(|e| PolylineError::Decode(e.to_string()))?;
    Ok(Polyline::new(line.coords().map(|c| (c.x, c.y)).collect()))
}

/// Encodes a polyline with precision 6.
pub fn encode6(polyline: &Polyline) -> Result<String, PolylineError> {
    encode(polyline, PRECISION_6)
}

/// Encodes a polyline, writing each point latitude first.
pub fn encode(line: &Polyline, precision: u32) -> Result<String, PolylineError> {
    let coords = line.points().iter().map(|&(x, y)| geo_types::Coord { x, y });
    ::polyline::encode_coordinates(coords, precision)
        .map_err(|e| PolylineError::Encode(e.to_string()))
}
