//! Saving and restoring a route through project attributes.
//!
//! A saved route is four string attributes. Restoring replays the stored
//! response through the same decode path, so a reloaded route is identical
//! to the one that was saved and the routing service is never queried.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::costing::{CostingOptions, Profile};
use crate::route::{RouteError, RoutePoint, RouteResult, WktPointError};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("invalid `{field}` attribute: {source}")]
    Json {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Point(#[from] WktPointError),

    #[error("stored response cannot be rebuilt: {0}")]
    Route(#[from] RouteError),
}

/// The attributes written to the project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRoute {
    /// JSON of the raw routing response, `null` when there is no route.
    pub response: String,
    /// JSON list of WKT points.
    pub points: String,
    pub profile: String,
    /// JSON object of costing options.
    #[serde(rename = "costingOptions")]
    pub costing_options: String,
}

/// Everything needed to redraw a route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSnapshot {
    pub result: Option<RouteResult>,
    pub points: Vec<RoutePoint>,
    pub profile: Profile,
    pub costing_options: CostingOptions,
}

pub fn to_persisted(snapshot: &RouteSnapshot) -> Result<PersistedRoute, PersistError> {
    let response = match &snapshot.result {
        Some(result) => to_json("response", result.raw())?,
        None => to_json("response", &Value::Null)?,
    };
    let points: Vec<String> = snapshot.points.iter().map(RoutePoint::to_wkt).collect();

    Ok(PersistedRoute {
        response,
        points: to_json("points", &points)?,
        profile: snapshot.profile.as_str().to_string(),
        costing_options: to_json("costingOptions", &snapshot.costing_options)?,
    })
}

pub fn from_persisted(persisted: &PersistedRoute) -> Result<RouteSnapshot, PersistError> {
    let response: Value = from_json("response", &persisted.response)?;
    let points: Vec<String> = from_json("points", &persisted.points)?;
    let costing_options: CostingOptions =
        from_json("costingOptions", &persisted.costing_options)?;

    let points = points
        .iter()
        .map(|wkt| RoutePoint::from_wkt(wkt))
        .collect::<Result<Vec<_>, _>>()?;

    let result = match response {
        Value::Null => None,
        raw => Some(RouteResult::from_response(raw)?),
    };

    Ok(RouteSnapshot {
        result,
        points,
        profile: Profile::new(persisted.profile.clone()),
        costing_options,
    })
}

fn to_json<T: Serialize + ?Sized>(field: &'static str, value: &T) -> Result<String, PersistError> {
    serde_json::to_string(value).map_err(|source| PersistError::Json { field, source })
}

fn from_json<T: for<'de> Deserialize<'de>>(field: &'static str, text: &str) -> Result<T, PersistError> {
    serde_json::from_str(text).map_err(|source| PersistError::Json { field, source })
}
