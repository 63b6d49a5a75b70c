//! A two-leg route through the Bernese Oberland.
//!
//! Shapes are precision-6 encoded polylines, latitude first, as the
//! routing service sends them.

use serde_json::{Value, json};

use route_geometry::route::RoutePoint;

pub const BERN: RoutePoint = RoutePoint::new(7.439583, 46.948420);
pub const THUN: RoutePoint = RoutePoint::new(7.627830, 46.754300);
pub const INTERLAKEN: RoutePoint = RoutePoint::new(7.863510, 46.683690);

pub const BERN_THUN_SHAPE: &str = "gcopxA}laeMfxL}mWbahAgoeAbjpA_itAfpyBsmkBvkwAs|mA";
pub const THUN_INTERLAKEN_SHAPE: &str = "w~sdxAkbqpM~|{@{bgB~tdAkujDzkAci~Cf{CsdX";

/// Decoded `(lon, lat)` points of [`BERN_THUN_SHAPE`].
pub const BERN_THUN_POINTS: &[(f64, f64)] = &[
    (7.439583, 46.948420),
    (7.452110, 46.941360),
    (7.488210, 46.903950),
    (7.531890, 46.862300),
    (7.587420, 46.799560),
    (7.627830, 46.754300),
];

/// Decoded `(lon, lat)` points of [`THUN_INTERLAKEN_SHAPE`].
pub const THUN_INTERLAKEN_POINTS: &[(f64, f64)] = &[
    (7.627830, 46.754300),
    (7.681140, 46.723100),
    (7.769050, 46.687420),
    (7.850620, 46.686190),
    (7.863510, 46.683690),
];

pub const BERN_THUN_TIME: f64 = 1834.512;
pub const THUN_INTERLAKEN_TIME: f64 = 1377.25;
pub const BERN_THUN_LENGTH: f64 = 28.4566;
pub const THUN_INTERLAKEN_LENGTH: f64 = 27.1236;

pub fn waypoints() -> Vec<RoutePoint> {
    vec![BERN, THUN, INTERLAKEN]
}

pub fn trip_response() -> Value {
    json!({
        "trip": {
            "locations": [
                {"type": "break", "lat": 46.948420, "lon": 7.439583},
                {"type": "break", "lat": 46.754300, "lon": 7.627830},
                {"type": "break", "lat": 46.683690, "lon": 7.863510}
            ],
            "legs": [
                {
                    "maneuvers": [
                        {"type": 1, "instruction": "Drive south on Bundesgasse.", "length": 0.4, "time": 52.1},
                        {"type": 10, "instruction": "Take the A6 toward Thun.", "length": 27.9, "time": 1760.0},
                        {"type": 4, "instruction": "You have arrived at your stop.", "length": 0.0, "time": 0.0}
                    ],
                    "summary": {"time": BERN_THUN_TIME, "length": BERN_THUN_LENGTH, "has_highway": true},
                    "shape": BERN_THUN_SHAPE
                },
                {
                    "maneuvers": [
                        {"type": 1, "instruction": "Drive east on Allmendstrasse.", "length": 1.1, "time": 95.0},
                        {"type": 6, "instruction": "You have arrived at your destination.", "length": 0.0, "time": 0.0}
                    ],
                    "summary": {"time": THUN_INTERLAKEN_TIME, "length": THUN_INTERLAKEN_LENGTH, "has_highway": true},
                    "shape": THUN_INTERLAKEN_SHAPE
                }
            ],
            "summary": {"time": 3211.762, "length": 55.58},
            "status_message": "Found route between points",
            "status": 0,
            "units": "kilometers",
            "language": "en-US"
        },
        "id": "bernese_oberland"
    })
}

/// One leg per `(time, length)` pair, all on the same short shape.
pub fn uniform_legs(summaries: &[(f64, f64)]) -> Value {
    let legs: Vec<Value> = summaries
        .iter()
        .map(|&(time, length)| {
            json!({
                "maneuvers": [],
                "summary": {"time": time, "length": length},
                "shape": THUN_INTERLAKEN_SHAPE
            })
        })
        .collect();
    json!({"trip": {"legs": legs}})
}
