//! route-geometry
//!
//! Turns routing-service trip responses into drawable route geometry,
//! keeps the current route consistent across rebuilds, and saves/restores
//! it through project attributes.

pub mod traits;
pub mod polyline;
pub mod response;
pub mod route;
pub mod builder;
pub mod costing;
pub mod persist;
pub mod reachability;
pub mod valhalla;
pub mod session;
