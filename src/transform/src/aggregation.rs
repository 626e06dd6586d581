//! Aggregation values produced by the collection pipeline.
//!
//! An [`Aggregation`] is inspected through views: an aggregation that can be
//! read as a sum hands out `&dyn Sum`, one that tracks min, max, sum and count
//! hands out `&dyn MinMaxSumCount`. Kinds that expose neither view cannot be
//! converted.

use std::cmp::Ordering;
use std::fmt;

use crate::error::AggregationError;
use crate::number::{Number, NumberKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    Sum,
    MinMaxSumCount,
    LastValue,
    Histogram,
    Sketch,
    Exact,
}

impl AggregationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationKind::Sum => "Sum",
            AggregationKind::MinMaxSumCount => "MinMaxSumCount",
            AggregationKind::LastValue => "LastValue",
            AggregationKind::Histogram => "Histogram",
            AggregationKind::Sketch => "Sketch",
            AggregationKind::Exact => "Exact",
        }
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Aggregation: fmt::Debug + Send + Sync {
    fn kind(&self) -> AggregationKind;

    fn as_min_max_sum_count(&self) -> Option<&dyn MinMaxSumCount> {
        None
    }

    fn as_sum(&self) -> Option<&dyn Sum> {
        None
    }
}

pub trait Sum {
    fn sum(&self) -> Result<Number, AggregationError>;
}

pub trait MinMaxSumCount: Sum {
    fn min(&self) -> Result<Number, AggregationError>;
    fn max(&self) -> Result<Number, AggregationError>;
    fn count(&self) -> Result<u64, AggregationError>;
}

/// Checkpointed value of a sum aggregator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SumValue {
    sum: Option<Number>,
}

impl SumValue {
    pub fn new(sum: Number) -> Self {
        Self { sum: Some(sum) }
    }

    /// A sum that never observed a measurement.
    pub fn empty() -> Self {
        Self { sum: None }
    }
}

impl Aggregation for SumValue {
    fn kind(&self) -> AggregationKind {
        AggregationKind::Sum
    }

    fn as_sum(&self) -> Option<&dyn Sum> {
        Some(self)
    }
}

impl Sum for SumValue {
    fn sum(&self) -> Result<Number, AggregationError> {
        self.sum.ok_or(AggregationError::NoDataCollected)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct MinMaxSumCountState {
    min: Number,
    max: Number,
    sum: Number,
    count: u64,
}

fn keep_extreme(kind: NumberKind, current: Number, candidate: Number, wanted: Ordering) -> Number {
    match candidate.partial_cmp_with(kind, current) {
        Some(ordering) if ordering == wanted => candidate,
        None if current.as_f64().is_nan() && kind == NumberKind::Float64 => candidate,
        _ => current,
    }
}

/// Checkpointed value of a min-max-sum-count aggregator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxSumCountValue {
    kind: NumberKind,
    state: Option<MinMaxSumCountState>,
}

impl MinMaxSumCountValue {
    pub fn empty(kind: NumberKind) -> Self {
        Self { kind, state: None }
    }

    /// Folds `numbers` (all of `kind`) into a single checkpoint.
    ///
    /// NaN measurements count towards `count` and `sum` but never become the
    /// min or max while a non-NaN measurement is available.
    pub fn from_numbers(kind: NumberKind, numbers: impl IntoIterator<Item = Number>) -> Self {
        let state = numbers.into_iter().fold(None, |state, number| {
            Some(match state {
                None => MinMaxSumCountState {
                    min: number,
                    max: number,
                    sum: number,
                    count: 1,
                },
                Some(MinMaxSumCountState {
                    min,
                    max,
                    sum,
                    count,
                }) => MinMaxSumCountState {
                    min: keep_extreme(kind, min, number, Ordering::Less),
                    max: keep_extreme(kind, max, number, Ordering::Greater),
                    sum: sum.add(kind, number),
                    count: count + 1,
                },
            })
        });
        Self { kind, state }
    }

    pub fn number_kind(&self) -> NumberKind {
        self.kind
    }

    fn state(&self) -> Result<&MinMaxSumCountState, AggregationError> {
        self.state.as_ref().ok_or(AggregationError::NoDataCollected)
    }
}

impl Aggregation for MinMaxSumCountValue {
    fn kind(&self) -> AggregationKind {
        AggregationKind::MinMaxSumCount
    }

    fn as_min_max_sum_count(&self) -> Option<&dyn MinMaxSumCount> {
        Some(self)
    }

    fn as_sum(&self) -> Option<&dyn Sum> {
        Some(self)
    }
}

impl Sum for MinMaxSumCountValue {
    fn sum(&self) -> Result<Number, AggregationError> {
        self.state().map(|state| state.sum)
    }
}

impl MinMaxSumCount for MinMaxSumCountValue {
    fn min(&self) -> Result<Number, AggregationError> {
        self.state().map(|state| state.min)
    }

    fn max(&self) -> Result<Number, AggregationError> {
        self.state().map(|state| state.max)
    }

    fn count(&self) -> Result<u64, AggregationError> {
        self.state().map(|state| state.count)
    }
}

/// Most recent measurement of a gauge-like instrument. Has no New Relic
/// metric counterpart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LastValue {
    value: Number,
}

impl LastValue {
    pub fn new(value: Number) -> Self {
        Self { value }
    }

    pub fn value(&self) -> Number {
        self.value
    }
}

impl Aggregation for LastValue {
    fn kind(&self) -> AggregationKind {
        AggregationKind::LastValue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sum_reports_no_data() {
        assert_eq!(SumValue::empty().sum(), Err(AggregationError::NoDataCollected));
        assert_eq!(
            SumValue::new(Number::from_i64(7)).sum(),
            Ok(Number::from_i64(7))
        );
    }

    #[test]
    fn test_min_max_sum_count_from_int_numbers() {
        let value = MinMaxSumCountValue::from_numbers(
            NumberKind::Int64,
            [4, -2, 9, 1].map(Number::from_i64),
        );

        assert_eq!(value.min().unwrap().as_i64(), -2);
        assert_eq!(value.max().unwrap().as_i64(), 9);
        assert_eq!(value.sum().unwrap().as_i64(), 12);
        assert_eq!(value.count().unwrap(), 4);
    }

    #[test]
    fn test_min_max_sum_count_ignores_nan_for_bounds() {
        let value = MinMaxSumCountValue::from_numbers(
            NumberKind::Float64,
            [f64::NAN, 1.5, 0.5].map(Number::from_f64),
        );

        assert_eq!(value.min().unwrap().as_f64(), 0.5);
        assert_eq!(value.max().unwrap().as_f64(), 1.5);
        assert!(value.sum().unwrap().as_f64().is_nan());
        assert_eq!(value.count().unwrap(), 3);
    }

    #[test]
    fn test_empty_min_max_sum_count_reports_no_data() {
        let value = MinMaxSumCountValue::from_numbers(NumberKind::Float64, Vec::new());
        assert_eq!(value, MinMaxSumCountValue::empty(NumberKind::Float64));
        assert_eq!(value.min(), Err(AggregationError::NoDataCollected));
        assert_eq!(value.count(), Err(AggregationError::NoDataCollected));
    }

    #[test]
    fn test_views_match_kind() {
        let sum = SumValue::new(Number::from_f64(1.0));
        assert!(sum.as_sum().is_some());
        assert!(sum.as_min_max_sum_count().is_none());

        let mmsc = MinMaxSumCountValue::empty(NumberKind::Int64);
        assert!(mmsc.as_min_max_sum_count().is_some());
        assert!(mmsc.as_sum().is_some());

        let last = LastValue::new(Number::from_i64(3));
        assert_eq!(last.kind(), AggregationKind::LastValue);
        assert!(last.as_sum().is_none());
        assert!(last.as_min_max_sum_count().is_none());
    }
}
