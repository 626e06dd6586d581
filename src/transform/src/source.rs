use opentelemetry::{Key, KeyValue, Value};
use opentelemetry_sdk::Resource;

use crate::model::LabelSet;

/// A finite collection of key/value attributes that can be walked once per use.
pub trait AttributeSource {
    /// Number of entries `attributes` yields.
    fn attribute_count(&self) -> usize;

    fn attributes(&self) -> impl Iterator<Item = (&Key, &Value)>;
}

impl AttributeSource for Resource {
    fn attribute_count(&self) -> usize {
        self.len()
    }

    fn attributes(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.iter()
    }
}

impl AttributeSource for LabelSet {
    fn attribute_count(&self) -> usize {
        self.len()
    }

    fn attributes(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.iter().map(|kv| (&kv.key, &kv.value))
    }
}

impl AttributeSource for [KeyValue] {
    fn attribute_count(&self) -> usize {
        self.len()
    }

    fn attributes(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.iter().map(|kv| (&kv.key, &kv.value))
    }
}
