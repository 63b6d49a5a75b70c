//! Reachability intervals for isochrone and isodistance requests.

use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachabilityMode {
    /// Intervals are whole minutes.
    Isochrone,
    /// Intervals are kilometers.
    Isodistance,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("no interval given")]
    Empty,

    #[error("invalid interval {0:?}")]
    Invalid(String),
}

/// Sorted contour values.
#[derive(Debug, Clone, PartialEq)]
pub enum Intervals {
    Minutes(Vec<u32>),
    Kilometers(Vec<f64>),
}

impl Intervals {
    pub fn mode(&self) -> ReachabilityMode {
        match self {
            Intervals::Minutes(_) => ReachabilityMode::Isochrone,
            Intervals::Kilometers(_) => ReachabilityMode::Isodistance,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Intervals::Minutes(values) => values.len(),
            Intervals::Kilometers(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `contours` array of an isochrone request.
    pub fn contours(&self) -> Vec<Value> {
        match self {
            Intervals::Minutes(values) => values.iter().map(|m| json!({ "time": m })).collect(),
            Intervals::Kilometers(values) => {
                values.iter().map(|km| json!({ "distance": km })).collect()
            }
        }
    }
}

/// Parses a `;`-separated interval list such as `"5; 10;15"`.
///
/// Whitespace anywhere is ignored and empty items are skipped. The values
/// come back sorted ascending.
pub fn parse_intervals(text: &str, mode: ReachabilityMode) -> Result<Intervals, IntervalError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let items = compact.split(';').filter(|item| !item.is_empty());

    let intervals = match mode {
        ReachabilityMode::Isochrone => {
            let mut minutes = items
                .map(|item| {
                    item.parse::<u32>()
                        .map_err(|_| IntervalError::Invalid(item.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            minutes.sort_unstable();
            Intervals::Minutes(minutes)
        }
        ReachabilityMode::Isodistance => {
            let mut kilometers = items
                .map(|item| match item.parse::<f64>() {
                    Ok(km) if km.is_finite() && km >= 0.0 => Ok(km),
                    _ => Err(IntervalError::Invalid(item.to_string())),
                })
                .collect::<Result<Vec<_>, _>>()?;
            kilometers.sort_by(f64::total_cmp);
            Intervals::Kilometers(kilometers)
        }
    };

    if intervals.is_empty() {
        return Err(IntervalError::Empty);
    }
    Ok(intervals)
}
