//! Merging of resource, label and descriptor attributes.

use opentelemetry::{Array, Value};
use serde_json::Value as JsonValue;

use crate::metric::Attributes;
use crate::model::{Descriptor, LabelSet};
use crate::source::AttributeSource;

pub const SERVICE_NAME_ATTR_KEY: &str = opentelemetry_semantic_conventions::resource::SERVICE_NAME;

/// Registered New Relic attributes identifying where the data came from.
pub const INSTRUMENTATION_PROVIDER_ATTR_KEY: &str = "instrumentation.provider";
pub const INSTRUMENTATION_PROVIDER_ATTR_VALUE: &str = "opentelemetry";
pub const COLLECTOR_NAME_ATTR_KEY: &str = "collector.name";
pub const COLLECTOR_NAME_ATTR_VALUE: &str = "newrelic-opentelemetry-exporter";

pub const UNIT_ATTR_KEY: &str = "unit";
pub const DESCRIPTION_ATTR_KEY: &str = "description";

/// Builds the flat attribute map attached to every metric of `labels`.
///
/// Later sources overwrite earlier ones: resource, then labels, then unit and
/// description, then the service name, and finally the provenance attributes.
pub fn build_attributes<R>(
    service: &str,
    resource: &R,
    descriptor: &Descriptor,
    labels: &LabelSet,
) -> Attributes
where
    R: AttributeSource + ?Sized,
{
    let unit = descriptor.unit();
    let description = descriptor.description();

    let capacity = 2
        + resource.attribute_count()
        + labels.len()
        + usize::from(unit.is_some())
        + usize::from(description.is_some())
        + usize::from(!service.is_empty());
    let mut attrs = Attributes::with_capacity(capacity);

    for (key, value) in resource.attributes() {
        attrs.insert(key.as_str().to_owned(), value_to_json(value));
    }

    // Labels take precedence over resource attributes with the same key.
    for (key, value) in labels.attributes() {
        attrs.insert(key.as_str().to_owned(), value_to_json(value));
    }

    if let Some(unit) = unit {
        attrs.insert(UNIT_ATTR_KEY.to_owned(), JsonValue::from(unit));
    }
    if let Some(description) = description {
        attrs.insert(DESCRIPTION_ATTR_KEY.to_owned(), JsonValue::from(description));
    }
    if !service.is_empty() {
        attrs.insert(SERVICE_NAME_ATTR_KEY.to_owned(), JsonValue::from(service));
    }

    attrs.insert(
        INSTRUMENTATION_PROVIDER_ATTR_KEY.to_owned(),
        JsonValue::from(INSTRUMENTATION_PROVIDER_ATTR_VALUE),
    );
    attrs.insert(
        COLLECTOR_NAME_ATTR_KEY.to_owned(),
        JsonValue::from(COLLECTOR_NAME_ATTR_VALUE),
    );

    attrs
}

/// Converts an OpenTelemetry attribute value into its JSON form.
///
/// Non-finite floats have no JSON representation and become `null`.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::I64(v) => JsonValue::from(*v),
        Value::F64(v) => float_to_json(*v),
        Value::String(v) => JsonValue::String(v.as_str().to_owned()),
        Value::Array(array) => array_to_json(array),
        #[allow(unreachable_patterns)]
        other => JsonValue::String(other.to_string()),
    }
}

fn float_to_json(v: f64) -> JsonValue {
    serde_json::Number::from_f64(v)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

fn array_to_json(array: &Array) -> JsonValue {
    match array {
        Array::Bool(values) => values.iter().copied().map(JsonValue::Bool).collect(),
        Array::I64(values) => values.iter().copied().map(JsonValue::from).collect(),
        Array::F64(values) => values.iter().copied().map(float_to_json).collect(),
        Array::String(values) => values
            .iter()
            .map(|v| JsonValue::String(v.as_str().to_owned()))
            .collect(),
        #[allow(unreachable_patterns)]
        other => JsonValue::String(other.to_string()),
    }
}
