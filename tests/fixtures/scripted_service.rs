//! A routing service that replays scripted responses.

use std::cell::RefCell;
use std::collections::VecDeque;

use geojson::FeatureCollection;
use serde_json::Value;

use route_geometry::traits::{IsochroneRequest, MapMatchRequest, RouteRequest, RoutingService};
use route_geometry::valhalla::ServiceError;

#[derive(Default)]
pub struct ScriptedService {
    responses: RefCell<VecDeque<Result<Value, ServiceError>>>,
    isochrones: RefCell<VecDeque<Result<FeatureCollection, ServiceError>>>,
    pub route_requests: RefCell<Vec<RouteRequest>>,
    pub map_match_requests: RefCell<Vec<MapMatchRequest>>,
    pub isochrone_requests: RefCell<Vec<IsochroneRequest>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: Value) -> &Self {
        self.responses.borrow_mut().push_back(Ok(response));
        self
    }

    pub fn fail(&self, status: u16, message: &str) -> &Self {
        self.responses.borrow_mut().push_back(Err(ServiceError::Service {
            status,
            code: Some(171),
            message: message.to_string(),
        }));
        self
    }

    pub fn respond_isochrones(&self, collection: FeatureCollection) -> &Self {
        self.isochrones.borrow_mut().push_back(Ok(collection));
        self
    }

    fn next(&self) -> Result<Value, ServiceError> {
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::InvalidRequest("no scripted response".to_string())))
    }
}

impl RoutingService for ScriptedService {
    fn route(&self, request: &RouteRequest) -> Result<Value, ServiceError> {
        self.route_requests.borrow_mut().push(request.clone());
        self.next()
    }

    fn map_matching(&self, request: &MapMatchRequest) -> Result<Value, ServiceError> {
        self.map_match_requests.borrow_mut().push(request.clone());
        self.next()
    }

    fn isochrones(&self, request: &IsochroneRequest) -> Result<FeatureCollection, ServiceError> {
        self.isochrone_requests.borrow_mut().push(request.clone());
        self.isochrones
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::InvalidRequest("no scripted isochrones".to_string())))
    }
}
