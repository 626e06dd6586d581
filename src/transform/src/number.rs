use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The numeric representation an instrument reports in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberKind {
    Int64,
    #[default]
    Float64,
}

impl NumberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberKind::Int64 => "int64",
            NumberKind::Float64 => "float64",
        }
    }
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw 64-bit numeric payload.
///
/// A `Number` does not know how it should be read; the [`NumberKind`] of the
/// instrument that produced it travels separately (on the descriptor) and
/// must be supplied to every interpretation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Number(u64);

impl Number {
    pub fn from_i64(value: i64) -> Self {
        Number(value as u64)
    }

    pub fn from_f64(value: f64) -> Self {
        Number(value.to_bits())
    }

    pub fn from_raw(raw: u64) -> Self {
        Number(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }

    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }

    pub fn as_f64(self) -> f64 {
        f64::from_bits(self.0)
    }

    /// Interprets the payload according to `kind` and returns it as an `f64`.
    ///
    /// Integers are widened with IEEE-754 round-to-nearest, ties-to-even.
    /// Every integer with a magnitude up to 2^53 converts exactly; larger
    /// magnitudes land on the nearest representable `f64`. Floating point
    /// payloads are returned bit-for-bit, NaN and infinities included.
    pub fn coerce_to_f64(self, kind: NumberKind) -> f64 {
        match kind {
            NumberKind::Int64 => self.as_i64() as f64,
            NumberKind::Float64 => self.as_f64(),
        }
    }

    /// Adds two payloads of the same kind. Integer addition wraps.
    pub fn add(self, kind: NumberKind, other: Number) -> Number {
        match kind {
            NumberKind::Int64 => Number::from_i64(self.as_i64().wrapping_add(other.as_i64())),
            NumberKind::Float64 => Number::from_f64(self.as_f64() + other.as_f64()),
        }
    }

    /// Like [`Number::add`], but `None` when integer addition overflows.
    pub fn checked_add(self, kind: NumberKind, other: Number) -> Option<Number> {
        match kind {
            NumberKind::Int64 => self
                .as_i64()
                .checked_add(other.as_i64())
                .map(Number::from_i64),
            NumberKind::Float64 => Some(self.add(kind, other)),
        }
    }

    /// Compares two payloads of the same kind. `None` when either float is NaN.
    pub fn partial_cmp_with(self, kind: NumberKind, other: Number) -> Option<Ordering> {
        match kind {
            NumberKind::Int64 => Some(self.as_i64().cmp(&other.as_i64())),
            NumberKind::Float64 => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}
