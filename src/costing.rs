//! Costing profiles and options passed through to the routing service.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the costing model, e.g. `auto` or `pedestrian`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(String);

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn auto() -> Self {
        Self::new("auto")
    }

    pub fn truck() -> Self {
        Self::new("truck")
    }

    pub fn bicycle() -> Self {
        Self::new("bicycle")
    }

    pub fn pedestrian() -> Self {
        Self::new("pedestrian")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::auto()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single costing option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CostingValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for CostingValue {
    fn from(value: bool) -> Self {
        CostingValue::Bool(value)
    }
}

impl From<f64> for CostingValue {
    fn from(value: f64) -> Self {
        CostingValue::Number(value)
    }
}

impl From<&str> for CostingValue {
    fn from(value: &str) -> Self {
        CostingValue::Text(value.to_string())
    }
}

impl From<String> for CostingValue {
    fn from(value: String) -> Self {
        CostingValue::Text(value)
    }
}

/// Options for one costing profile, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostingOptions(BTreeMap<String, CostingValue>);

impl CostingOptions {
    pub const SHORTEST: &'static str = "shortest";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<CostingValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<CostingValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&CostingValue> {
        self.0.get(name)
    }

    /// Ask for the shortest instead of the fastest route.
    pub fn set_shortest(&mut self, shortest: bool) {
        self.set(Self::SHORTEST, shortest);
    }

    pub fn is_shortest(&self) -> bool {
        matches!(self.get(Self::SHORTEST), Some(CostingValue::Bool(true)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CostingValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}
