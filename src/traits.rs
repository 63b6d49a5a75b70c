//! Routing service interface.
//!
//! The service is handed to whoever performs requests. Route building never
//! talks to it; it only transforms responses that were already fetched.

use geojson::FeatureCollection;
use serde_json::Value;

use crate::costing::{CostingOptions, Profile};
use crate::polyline::Polyline;
use crate::reachability::Intervals;
use crate::route::RoutePoint;
use crate::valhalla::ServiceError;

/// A ring of `(longitude, latitude)` points the route must not enter.
pub type AvoidPolygon = Vec<(f64, f64)>;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Origin, intermediate waypoints, destination.
    pub points: Vec<RoutePoint>,
    pub profile: Profile,
    pub costing_options: CostingOptions,
    pub avoid_polygons: Vec<AvoidPolygon>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMatchRequest {
    pub shape: Polyline,
    pub profile: Profile,
    pub costing_options: CostingOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneRequest {
    pub center: RoutePoint,
    pub profile: Profile,
    pub costing_options: CostingOptions,
    pub intervals: Intervals,
}

/// Computes routes, map matches and reachability envelopes.
///
/// Route and map-matching calls return the raw trip payload so it can be
/// stored verbatim alongside the route.
pub trait RoutingService {
    fn route(&self, request: &RouteRequest) -> Result<Value, ServiceError>;

    fn map_matching(&self, request: &MapMatchRequest) -> Result<Value, ServiceError>;

    fn isochrones(&self, request: &IsochroneRequest) -> Result<FeatureCollection, ServiceError>;
}

impl<S: RoutingService + ?Sized> RoutingService for &S {
    fn route(&self, request: &RouteRequest) -> Result<Value, ServiceError> {
        (**self).route(request)
    }

    fn map_matching(&self, request: &MapMatchRequest) -> Result<Value, ServiceError> {
        (**self).map_matching(request)
    }

    fn isochrones(&self, request: &IsochroneRequest) -> Result<FeatureCollection, ServiceError> {
        (**self).isochrones(request)
    }
}
