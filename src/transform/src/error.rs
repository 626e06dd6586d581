use crate::aggregation::AggregationKind;

/// Failure reported by an aggregation accessor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    #[error("no data collected by this aggregator")]
    NoDataCollected,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// The aggregation has no converter to a New Relic metric.
    #[error("unimplemented aggregator: {0}")]
    UnimplementedAggregation(AggregationKind),
    /// An accessor failed while reading the aggregation; surfaced as-is.
    #[error(transparent)]
    Extraction(#[from] AggregationError),
}
