//! Valhalla HTTP adapter for routes, map matching and isochrones.

use geojson::FeatureCollection;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::costing::{CostingOptions, Profile};
use crate::polyline;
use crate::route::RoutePoint;
use crate::traits::{IsochroneRequest, MapMatchRequest, RouteRequest, RoutingService};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("routing service returned {status}: {message}")]
    Service {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Clone)]
pub struct ValhallaConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ValhallaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ValhallaConfig {
    /// Defaults overridden by `VALHALLA_URL` and `VALHALLA_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("VALHALLA_URL") {
            config.base_url = base_url;
        }
        if let Some(timeout_secs) = std::env::var("VALHALLA_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config.timeout_secs = timeout_secs;
        }
        config
    }
}

#[derive(Debug, Clone)]
pub struct ValhallaClient {
    config: ValhallaConfig,
    client: reqwest::blocking::Client,
}

impl ValhallaClient {
    pub fn new(config: ValhallaConfig) -> Result<Self, ServiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ValhallaConfig {
        &self.config
    }

    fn post(&self, action: &str, body: &Value) -> Result<reqwest::blocking::Response, ServiceError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), action);
        debug!(%url, "routing service request");

        let response = self.client.post(url).json(body).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().unwrap_or_default();
        let body = serde_json::from_str::<ErrorBody>(&text).ok();
        Err(ServiceError::Service {
            status: status.as_u16(),
            code: body.as_ref().and_then(|body| body.error_code),
            message: body.map(|body| body.error).unwrap_or(text),
        })
    }
}

impl RoutingService for ValhallaClient {
    fn route(&self, request: &RouteRequest) -> Result<Value, ServiceError> {
        if request.points.len() < 2 {
            return Err(ServiceError::InvalidRequest(format!(
                "a route needs at least 2 points, got {}",
                request.points.len()
            )));
        }
        Ok(self.post("route", &route_body(request))?.json()?)
    }

    fn map_matching(&self, request: &MapMatchRequest) -> Result<Value, ServiceError> {
        if request.shape.len() < 2 {
            return Err(ServiceError::InvalidRequest(
                "map matching needs at least 2 points".to_string(),
            ));
        }
        Ok(self.post("trace_route", &map_match_body(request)?)?.json()?)
    }

    fn isochrones(&self, request: &IsochroneRequest) -> Result<FeatureCollection, ServiceError> {
        if request.intervals.is_empty() {
            return Err(ServiceError::InvalidRequest("no contour interval".to_string()));
        }
        Ok(self.post("isochrone", &isochrone_body(request))?.json()?)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error_code: Option<i64>,
    error: String,
}

fn location(point: &RoutePoint) -> Value {
    json!({ "lat": point.lat, "lon": point.lon })
}

fn costing(profile: &Profile, options: &CostingOptions) -> (Value, Value) {
    (
        json!(profile.as_str()),
        json!({ profile.as_str(): options }),
    )
}

pub(crate) fn route_body(request: &RouteRequest) -> Value {
    let (costing, costing_options) = costing(&request.profile, &request.costing_options);
    let mut body = json!({
        "locations": request.points.iter().map(location).collect::<Vec<_>>(),
        "costing": costing,
        "costing_options": costing_options,
        "directions_options": { "units": "kilometers" },
    });
    if !request.avoid_polygons.is_empty() {
        let rings: Vec<Vec<[f64; 2]>> = request
            .avoid_polygons
            .iter()
            .map(|ring| ring.iter().map(|&(lon, lat)| [lon, lat]).collect())
            .collect();
        body["exclude_polygons"] = json!(rings);
    }
    body
}

pub(crate) fn map_match_body(request: &MapMatchRequest) -> Result<Value, ServiceError> {
    let encoded = polyline::encode6(&request.shape)
        .map_err(|err| ServiceError::InvalidRequest(err.to_string()))?;
    let (costing, costing_options) = costing(&request.profile, &request.costing_options);
    Ok(json!({
        "encoded_polyline": encoded,
        "shape_match": "map_snap",
        "costing": costing,
        "costing_options": costing_options,
        "directions_options": { "units": "kilometers" },
    }))
}

pub(crate) fn isochrone_body(request: &IsochroneRequest) -> Value {
    let (costing, costing_options) = costing(&request.profile, &request.costing_options);
    json!({
        "locations": [location(&request.center)],
        "costing": costing,
        "costing_options": costing_options,
        "contours": request.intervals.contours(),
        "polygons": true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline::Polyline;
    use crate::reachability::Intervals;

    fn points() -> Vec<RoutePoint> {
        vec![RoutePoint::new(7.44, 46.95), RoutePoint::new(8.54, 47.37)]
    }

    #[test]
    fn test_route_body() {
        let request = RouteRequest {
            points: points(),
            profile: Profile::auto(),
            costing_options: CostingOptions::new().with("shortest", true),
            avoid_polygons: Vec::new(),
        };
        let body = route_body(&request);
        assert_eq!(body["locations"][0], json!({"lat": 46.95, "lon": 7.44}));
        assert_eq!(body["costing"], "auto");
        assert_eq!(body["costing_options"]["auto"]["shortest"], true);
        assert_eq!(body["directions_options"]["units"], "kilometers");
        assert!(body.get("exclude_polygons").is_none());
    }

    #[test]
    fn test_route_body_with_avoid_polygons() {
        let request = RouteRequest {
            points: points(),
            profile: Profile::truck(),
            costing_options: CostingOptions::new(),
            avoid_polygons: vec![vec![(7.0, 46.0), (7.1, 46.0), (7.1, 46.1), (7.0, 46.0)]],
        };
        let body = route_body(&request);
        assert_eq!(body["exclude_polygons"][0][1], json!([7.1, 46.0]));
    }

    #[test]
    fn test_map_match_body_encodes_shape() {
        let shape = Polyline::new(vec![(7.44, 46.95), (7.45, 46.96)]);
        let request = MapMatchRequest {
            shape: shape.clone(),
            profile: Profile::pedestrian(),
            costing_options: CostingOptions::new(),
        };
        let body = map_match_body(&request).unwrap();
        let encoded = body["encoded_polyline"].as_str().unwrap();
        assert_eq!(polyline::decode6(encoded).unwrap(), shape);
        assert_eq!(body["shape_match"], "map_snap");
    }

    #[test]
    fn test_map_match_body_rejects_out_of_range_shape() {
        let request = MapMatchRequest {
            shape: Polyline::new(vec![(7.44, 46.95), (7.45, 95.0)]),
            profile: Profile::pedestrian(),
            costing_options: CostingOptions::new(),
        };
        assert!(matches!(
            map_match_body(&request),
            Err(ServiceError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_isochrone_body() {
        let request = IsochroneRequest {
            center: RoutePoint::new(7.44, 46.95),
            profile: Profile::auto(),
            costing_options: CostingOptions::new(),
            intervals: Intervals::Minutes(vec![5, 10]),
        };
        let body = isochrone_body(&request);
        assert_eq!(body["contours"], json!([{"time": 5}, {"time": 10}]));
        assert_eq!(body["polygons"], true);
        assert_eq!(body["locations"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_route_rejects_single_point() {
        let client = ValhallaClient::new(ValhallaConfig::default()).unwrap();
        let request = RouteRequest {
            points: vec![RoutePoint::new(7.44, 46.95)],
            profile: Profile::auto(),
            costing_options: CostingOptions::new(),
            avoid_polygons: Vec::new(),
        };
        assert!(matches!(
            client.route(&request),
            Err(ServiceError::InvalidRequest(_))
        ));
    }
}
