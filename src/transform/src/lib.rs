//! Conversion of OpenTelemetry aggregation records into New Relic metrics.

pub mod aggregation;
pub mod attributes;
pub mod conversion;
pub mod error;
pub mod metric;
pub mod model;
pub mod number;
pub mod source;

pub use aggregation::{
    Aggregation, AggregationKind, LastValue, MinMaxSumCount, MinMaxSumCountValue, Sum, SumValue,
};
pub use attributes::build_attributes;
pub use conversion::transform_record;
pub use error::{AggregationError, TransformError};
pub use metric::{Attributes, Count, Metric, Summary};
pub use model::{Descriptor, LabelSet, Record};
pub use number::{Number, NumberKind};
pub use source::AttributeSource;
