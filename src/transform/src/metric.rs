//! Metric shapes accepted by the New Relic Metric API.

use std::collections::HashMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

pub type Attributes = HashMap<String, JsonValue>;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Metric {
    Count(Count),
    Summary(Summary),
}

impl Metric {
    pub fn name(&self) -> &str {
        match self {
            Metric::Count(count) => &count.name,
            Metric::Summary(summary) => &summary.name,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            Metric::Count(count) => &count.attributes,
            Metric::Summary(summary) => &summary.attributes,
        }
    }
}

/// The number of occurrences of an event over an interval.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Count {
    pub name: String,
    pub attributes: Attributes,
    pub value: f64,
}

/// Pre-aggregated distribution of measurements.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub name: String,
    pub attributes: Attributes,
    pub count: f64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Serialize)]
struct SummaryValue {
    count: f64,
    sum: f64,
    min: f64,
    max: f64,
}

// The Metric API nests the four summary fields under "value".
impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Summary", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("attributes", &self.attributes)?;
        state.serialize_field(
            "value",
            &SummaryValue {
                count: self.count,
                sum: self.sum,
                min: self.min,
                max: self.max,
            },
        )?;
        state.end()
    }
}
