use crate::aggregation::{MinMaxSumCount, Sum};
use crate::attributes::build_attributes;
use crate::error::{AggregationError, TransformError};
use crate::metric::{Attributes, Count, Metric, Summary};
use crate::model::{Descriptor, Record};
use crate::number::Number;
use crate::source::AttributeSource;

/// Transforms an aggregation record into a New Relic metric.
///
/// Sum aggregations become a [`Count`], min-max-sum-count aggregations a
/// [`Summary`]. Any other aggregation yields
/// [`TransformError::UnimplementedAggregation`].
#[tracing::instrument(level = "trace", skip_all, fields(metric = %record.descriptor.name))]
pub fn transform_record<R>(
    service: &str,
    resource: &R,
    record: Record<'_>,
) -> Result<Metric, TransformError>
where
    R: AttributeSource + ?Sized,
{
    let descriptor = record.descriptor;
    let attrs = build_attributes(service, resource, descriptor, record.labels);

    // A min-max-sum-count aggregation can also be read as a sum, so it is
    // matched first.
    if let Some(agg) = record.aggregation.as_min_max_sum_count() {
        return min_max_sum_count(descriptor, attrs, agg);
    }
    if let Some(agg) = record.aggregation.as_sum() {
        return sum(descriptor, attrs, agg);
    }
    Err(TransformError::UnimplementedAggregation(
        record.aggregation.kind(),
    ))
}

/// Transforms a sum aggregation into a [`Count`].
pub fn sum(
    descriptor: &Descriptor,
    attrs: Attributes,
    agg: &dyn Sum,
) -> Result<Metric, TransformError> {
    let sum = agg.sum()?;

    Ok(Metric::Count(Count {
        name: descriptor.name.clone(),
        attributes: attrs,
        value: sum.coerce_to_f64(descriptor.number_kind),
    }))
}

/// Reads min, max, sum and count, in that order, stopping at the first failure.
fn min_max_sum_count_values(
    agg: &dyn MinMaxSumCount,
) -> Result<(Number, Number, Number, u64), AggregationError> {
    let min = agg.min()?;
    let max = agg.max()?;
    let sum = agg.sum()?;
    let count = agg.count()?;
    Ok((min, max, sum, count))
}

/// Transforms a min-max-sum-count aggregation into a [`Summary`].
pub fn min_max_sum_count(
    descriptor: &Descriptor,
    attrs: Attributes,
    agg: &dyn MinMaxSumCount,
) -> Result<Metric, TransformError> {
    let (min, max, sum, count) = min_max_sum_count_values(agg)?;
    let kind = descriptor.number_kind;

    Ok(Metric::Summary(Summary {
        name: descriptor.name.clone(),
        attributes: attrs,
        count: count as f64,
        sum: sum.coerce_to_f64(kind),
        min: min.coerce_to_f64(kind),
        max: max.coerce_to_f64(kind),
    }))
}
