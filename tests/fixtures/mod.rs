//! Test fixtures for route-geometry.
//!
//! Provides:
//! - A two-leg trip response (Bern -> Thun -> Interlaken) with real shapes
//! - A scripted routing service that records requests

pub mod bernese_oberland;
pub mod scripted_service;

pub use bernese_oberland::*;
pub use scripted_service::*;
