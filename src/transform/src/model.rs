use std::fmt;

use opentelemetry::KeyValue;

use crate::aggregation::Aggregation;
use crate::number::NumberKind;

/// Static metadata about an instrument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    pub name: String,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub number_kind: NumberKind,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, number_kind: NumberKind) -> Self {
        Self {
            name: name.into(),
            unit: None,
            description: None,
            number_kind,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The unit, unless it is absent or empty.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref().filter(|unit| !unit.is_empty())
    }

    /// The description, unless it is absent or empty.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|description| !description.is_empty())
    }
}

/// Labels attached to a measurement, sorted by key with unique keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelSet {
    labels: Vec<KeyValue>,
}

impl LabelSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from `labels`. A key given more than once keeps its last value.
    pub fn new(labels: impl IntoIterator<Item = KeyValue>) -> Self {
        let mut sorted: Vec<KeyValue> = labels.into_iter().collect();
        // stable, so later duplicates stay after earlier ones
        sorted.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));

        let mut labels: Vec<KeyValue> = Vec::with_capacity(sorted.len());
        for kv in sorted {
            match labels.last_mut() {
                Some(last) if last.key == kv.key => *last = kv,
                _ => labels.push(kv),
            }
        }
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyValue> {
        self.labels.iter()
    }
}

impl FromIterator<KeyValue> for LabelSet {
    fn from_iter<T: IntoIterator<Item = KeyValue>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// One aggregated measurement stream, as handed over by the collection pipeline.
#[derive(Clone, Copy)]
pub struct Record<'a> {
    pub descriptor: &'a Descriptor,
    pub labels: &'a LabelSet,
    pub aggregation: &'a dyn Aggregation,
}

impl<'a> Record<'a> {
    pub fn new(
        descriptor: &'a Descriptor,
        labels: &'a LabelSet,
        aggregation: &'a dyn Aggregation,
    ) -> Self {
        Self {
            descriptor,
            labels,
            aggregation,
        }
    }
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("descriptor", &self.descriptor.name)
            .field("labels", &self.labels.len())
            .field("aggregation", &self.aggregation.kind())
            .finish()
    }
}
