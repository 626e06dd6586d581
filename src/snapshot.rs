//! JSON snapshots of aggregation records, as read by the `convert` command.
//!
//! ```json
//! {
//!   "resource": {"host.name": "web-1"},
//!   "records": [
//!     {
//!       "name": "http.server.duration",
//!       "unit": "ms",
//!       "number_kind": "int64",
//!       "labels": {"http.route": "/checkout"},
//!       "aggregation": {"kind": "min_max_sum_count", "values": [12, 40, 7]}
//!     }
//!   ]
//! }
//! ```

use opentelemetry::{Array, KeyValue, StringValue, Value};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use transform::{
    Aggregation, Descriptor, LabelSet, LastValue, MinMaxSumCountValue, Number, NumberKind, Record,
    SumValue,
};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("record {record}: {value} is not a valid {kind} number")]
    InvalidNumber {
        record: String,
        value: serde_json::Number,
        kind: NumberKind,
    },
    #[error("attribute {key}: unsupported value {value}")]
    UnsupportedAttribute { key: String, value: JsonValue },
    #[error("record {0}: a last_value aggregation needs at least one value")]
    EmptyLastValue(String),
    #[error("record {record}: sum of values overflows {kind}")]
    Overflow { record: String, kind: NumberKind },
}

#[derive(Debug, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub resource: Map<String, JsonValue>,
    pub records: Vec<RecordSnapshot>,
}

#[derive(Debug, Deserialize)]
pub struct RecordSnapshot {
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_kind: NumberKind,
    #[serde(default)]
    pub labels: Map<String, JsonValue>,
    pub aggregation: AggregationSnapshot,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationSnapshot {
    Sum {
        #[serde(default)]
        values: Vec<serde_json::Number>,
    },
    MinMaxSumCount {
        #[serde(default)]
        values: Vec<serde_json::Number>,
    },
    LastValue {
        #[serde(default)]
        values: Vec<serde_json::Number>,
    },
}

/// A decoded record that owns everything a [`Record`] borrows.
#[derive(Debug)]
pub struct PreparedRecord {
    pub descriptor: Descriptor,
    pub labels: LabelSet,
    pub aggregation: Box<dyn Aggregation>,
}

impl PreparedRecord {
    pub fn record(&self) -> Record<'_> {
        Record::new(&self.descriptor, &self.labels, self.aggregation.as_ref())
    }
}

impl Snapshot {
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn resource_attributes(&self) -> Result<Vec<KeyValue>, SnapshotError> {
        key_values(&self.resource)
    }

    pub fn prepare(&self) -> Result<Vec<PreparedRecord>, SnapshotError> {
        self.records.iter().map(RecordSnapshot::prepare).collect()
    }
}

impl RecordSnapshot {
    pub fn prepare(&self) -> Result<PreparedRecord, SnapshotError> {
        let mut descriptor = Descriptor::new(self.name.clone(), self.number_kind);
        descriptor.unit = self.unit.clone();
        descriptor.description = self.description.clone();

        let labels = LabelSet::new(key_values(&self.labels)?);

        let kind = self.number_kind;
        let aggregation: Box<dyn Aggregation> = match &self.aggregation {
            AggregationSnapshot::Sum { values } => match self.total(&self.numbers(values)?)? {
                Some(total) => Box::new(SumValue::new(total)),
                None => Box::new(SumValue::empty()),
            },
            AggregationSnapshot::MinMaxSumCount { values } => {
                let numbers = self.numbers(values)?;
                self.total(&numbers)?;
                Box::new(MinMaxSumCountValue::from_numbers(kind, numbers))
            }
            AggregationSnapshot::LastValue { values } => {
                let last = self
                    .numbers(values)?
                    .pop()
                    .ok_or_else(|| SnapshotError::EmptyLastValue(self.name.clone()))?;
                Box::new(LastValue::new(last))
            }
        };

        Ok(PreparedRecord {
            descriptor,
            labels,
            aggregation,
        })
    }

    /// Sum of `numbers`, `None` when empty. Integer overflow is an error.
    fn total(&self, numbers: &[Number]) -> Result<Option<Number>, SnapshotError> {
        let Some((first, rest)) = numbers.split_first() else {
            return Ok(None);
        };
        rest.iter()
            .try_fold(*first, |acc, n| acc.checked_add(self.number_kind, *n))
            .map(Some)
            .ok_or_else(|| SnapshotError::Overflow {
                record: self.name.clone(),
                kind: self.number_kind,
            })
    }

    fn numbers(&self, values: &[serde_json::Number]) -> Result<Vec<Number>, SnapshotError> {
        values
            .iter()
            .map(|value| {
                let number = match self.number_kind {
                    NumberKind::Int64 => value.as_i64().map(Number::from_i64),
                    NumberKind::Float64 => value.as_f64().map(Number::from_f64),
                };
                number.ok_or_else(|| SnapshotError::InvalidNumber {
                    record: self.name.clone(),
                    value: value.clone(),
                    kind: self.number_kind,
                })
            })
            .collect()
    }
}

fn key_values(attrs: &Map<String, JsonValue>) -> Result<Vec<KeyValue>, SnapshotError> {
    attrs
        .iter()
        .map(|(key, value)| {
            json_to_value(value)
                .map(|value| KeyValue::new(key.clone(), value))
                .ok_or_else(|| SnapshotError::UnsupportedAttribute {
                    key: key.clone(),
                    value: value.clone(),
                })
        })
        .collect()
}

/// Inverse of the attribute JSON encoding. Only primitives and homogeneous
/// arrays of primitives have an attribute representation.
fn json_to_value(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::Bool(b) => Some(Value::Bool(*b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Some(Value::I64(i)),
            None => n.as_f64().map(Value::F64),
        },
        JsonValue::String(s) => Some(Value::String(StringValue::from(s.clone()))),
        JsonValue::Array(items) => json_to_array(items).map(Value::Array),
        JsonValue::Null | JsonValue::Object(_) => None,
    }
}

fn json_to_array(items: &[JsonValue]) -> Option<Array> {
    let values: Vec<Value> = items.iter().map(json_to_value).collect::<Option<_>>()?;
    match values.first().cloned() {
        None | Some(Value::String(_)) => values
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Array::String),
        Some(Value::Bool(_)) => values
            .into_iter()
            .map(|v| match v {
                Value::Bool(b) => Some(b),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Array::Bool),
        Some(Value::I64(_)) if values.iter().all(|v| matches!(v, Value::I64(_))) => values
            .into_iter()
            .map(|v| match v {
                Value::I64(i) => Some(i),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Array::I64),
        // mixed integers and floats widen to floats
        Some(Value::I64(_) | Value::F64(_)) => values
            .into_iter()
            .map(|v| match v {
                Value::F64(f) => Some(f),
                Value::I64(i) => Some(i as f64),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Array::F64),
        _ => None,
    }
}
