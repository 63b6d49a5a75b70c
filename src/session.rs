//! A computed route together with the inputs that produced it.
//!
//! The session owns the waypoints, costing profile and options of one route
//! and asks the injected [`RoutingService`] for new responses. Inputs are
//! only committed once the response has been turned into a route, so a
//! failed update leaves the previous route and its inputs in place.

use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::builder::RouteGeometryBuilder;
use crate::costing::{CostingOptions, Profile};
use crate::persist::{self, PersistError, PersistedRoute, RouteSnapshot};
use crate::polyline::Polyline;
use crate::reachability::Intervals;
use crate::route::{RouteError, RoutePoint, RouteResult};
use crate::traits::{AvoidPolygon, IsochroneRequest, MapMatchRequest, RouteRequest, RoutingService};
use crate::valhalla::ServiceError;

#[derive(Debug, Error)]
pub enum ComputeError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("expected {expected} points, got {actual}")]
    PointCount { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not compute route")]
    CouldNotComputeRoute(#[source] ComputeError),

    #[error("could not compute isochrones")]
    CouldNotComputeIsochrones(#[source] ServiceError),

    #[error("could not save route")]
    Save(#[source] PersistError),

    #[error("could not restore route")]
    Restore(#[source] PersistError),
}

fn route_failed(err: impl Into<ComputeError>) -> SessionError {
    let err = err.into();
    error!(error = ?err, "could not compute route");
    SessionError::CouldNotComputeRoute(err)
}

pub struct RouteSession<S> {
    service: S,
    builder: RouteGeometryBuilder,
    points: Vec<RoutePoint>,
    profile: Profile,
    costing_options: CostingOptions,
    avoid_polygons: Vec<AvoidPolygon>,
    /// The traced line behind a map-matched route.
    traced: Option<Polyline>,
}

impl<S: RoutingService> RouteSession<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            builder: RouteGeometryBuilder::new(),
            points: Vec::new(),
            profile: Profile::default(),
            costing_options: CostingOptions::default(),
            avoid_polygons: Vec::new(),
            traced: None,
        }
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn costing_options(&self) -> &CostingOptions {
        &self.costing_options
    }

    /// The traced line when the current route came from map matching.
    pub fn traced_shape(&self) -> Option<&Polyline> {
        self.traced.as_ref()
    }

    pub fn has_route(&self) -> bool {
        self.builder.has_route()
    }

    pub fn result(&self) -> Option<&RouteResult> {
        self.builder.result()
    }

    /// Computes a route through `points` and makes it current.
    ///
    /// A `null` response from the service keeps the current route and
    /// inputs.
    pub fn update_route(
        &mut self,
        points: Vec<RoutePoint>,
        profile: Profile,
        costing_options: CostingOptions,
        avoid_polygons: Vec<AvoidPolygon>,
    ) -> Result<Option<&RouteResult>, SessionError> {
        let request = RouteRequest {
            points,
            profile,
            costing_options,
            avoid_polygons,
        };
        let response = self.service.route(&request).map_err(route_failed)?;

        if self.apply(response)? {
            self.points = request.points;
            self.profile = request.profile;
            self.costing_options = request.costing_options;
            self.avoid_polygons = request.avoid_polygons;
            self.traced = None;
        }
        Ok(self.builder.result())
    }

    /// Recomputes the route after waypoints were moved.
    ///
    /// `points` must hold one position per existing waypoint, in order. A
    /// map-matched route moves the ends of its traced line and is matched
    /// again.
    pub fn update_from_pins(
        &mut self,
        points: Vec<RoutePoint>,
    ) -> Result<Option<&RouteResult>, SessionError> {
        if points.len() != self.points.len() {
            return Err(route_failed(ComputeError::PointCount {
                expected: self.points.len(),
                actual: points.len(),
            }));
        }
        let profile = self.profile.clone();
        let costing_options = self.costing_options.clone();

        if let Some(traced) = &self.traced {
            let mut shape = traced.points().to_vec();
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                if let Some(start) = shape.first_mut() {
                    *start = (first.lon, first.lat);
                }
                if let Some(end) = shape.last_mut() {
                    *end = (last.lon, last.lat);
                }
            }
            return self.update_from_polyline(Polyline::new(shape), profile, costing_options);
        }

        let avoid_polygons = self.avoid_polygons.clone();
        self.update_route(points, profile, costing_options, avoid_polygons)
    }

    /// Snaps a traced line to the road network and makes it the route.
    ///
    /// The first and last points of `shape` become the waypoints and the
    /// whole shape is kept, so moving a pin or reversing matches it again
    /// instead of routing between the two ends.
    pub fn update_from_polyline(
        &mut self,
        shape: Polyline,
        profile: Profile,
        costing_options: CostingOptions,
    ) -> Result<Option<&RouteResult>, SessionError> {
        let request = MapMatchRequest {
            shape,
            profile,
            costing_options,
        };
        let response = self.service.map_matching(&request).map_err(route_failed)?;

        if self.apply(response)? {
            let ends = [request.shape.points().first(), request.shape.points().last()];
            self.points = ends
                .into_iter()
                .flatten()
                .map(|&(lon, lat)| RoutePoint::new(lon, lat))
                .collect();
            self.profile = request.profile;
            self.costing_options = request.costing_options;
            self.avoid_polygons.clear();
            self.traced = Some(request.shape);
        }
        Ok(self.builder.result())
    }

    /// Swaps origin and destination (and reverses the waypoints between).
    ///
    /// A map-matched route is matched again along the reversed traced line.
    pub fn reverse(&mut self) -> Result<Option<&RouteResult>, SessionError> {
        if let Some(traced) = &self.traced {
            let shape = Polyline::new(traced.points().iter().rev().copied().collect());
            let profile = self.profile.clone();
            let costing_options = self.costing_options.clone();
            return self.update_from_polyline(shape, profile, costing_options);
        }

        let mut points = self.points.clone();
        points.reverse();
        self.update_from_pins(points)
    }

    pub fn clear(&mut self) {
        self.builder.clear();
        self.points.clear();
        self.avoid_polygons.clear();
        self.traced = None;
    }

    pub fn isochrones(
        &self,
        center: RoutePoint,
        intervals: Intervals,
    ) -> Result<FeatureCollection, SessionError> {
        let request = IsochroneRequest {
            center,
            profile: self.profile.clone(),
            costing_options: self.costing_options.clone(),
            intervals,
        };
        self.service.isochrones(&request).map_err(|err| {
            error!(error = ?err, "could not compute isochrones");
            SessionError::CouldNotComputeIsochrones(err)
        })
    }

    /// The attributes to store in the project file.
    pub fn save(&self) -> Result<PersistedRoute, SessionError> {
        persist::to_persisted(&self.snapshot()).map_err(SessionError::Save)
    }

    /// Restores a saved route without querying the routing service.
    pub fn restore(&mut self, persisted: &PersistedRoute) -> Result<(), SessionError> {
        let snapshot = persist::from_persisted(persisted).map_err(|err| {
            error!(error = ?err, "could not restore route");
            SessionError::Restore(err)
        })?;

        match snapshot.result {
            Some(result) => self.builder.set_result(result),
            None => self.builder.clear(),
        }
        self.points = snapshot.points;
        self.profile = snapshot.profile;
        self.costing_options = snapshot.costing_options;
        self.avoid_polygons.clear();
        self.traced = None;
        Ok(())
    }

    pub fn snapshot(&self) -> RouteSnapshot {
        RouteSnapshot {
            result: self.builder.result().cloned(),
            points: self.points.clone(),
            profile: self.profile.clone(),
            costing_options: self.costing_options.clone(),
        }
    }

    /// The route as a line feature with `id`, `distance` and `duration`.
    pub fn to_geojson_feature(&self) -> Option<Feature> {
        self.builder.result().map(route_feature)
    }

    /// Returns whether a new route was applied.
    fn apply(&mut self, response: Value) -> Result<bool, SessionError> {
        if response.is_null() {
            debug!("routing service returned no route");
            return Ok(false);
        }
        self.builder
            .build_from_response(Some(response))
            .map_err(route_failed)?;
        Ok(true)
    }
}

pub fn route_feature(result: &RouteResult) -> Feature {
    let line: geo_types::LineString<f64> = result.geometry().into();
    let mut feature = Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&line))),
        id: None,
        properties: None,
        foreign_members: None,
    };
    feature.set_property("id", 1);
    feature.set_property("distance", result.distance());
    feature.set_property("duration", result.duration());
    feature
}
