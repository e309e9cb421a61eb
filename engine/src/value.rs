//! FILENAME: engine/src/value.rs
//! PURPOSE: The tagged value type shared by every reporting crate.
//! CONTEXT: Header values, raw contributions and aggregated results are all
//! `CellValue`s. A missing value is `Option::None` at the use site; there is
//! no `Empty` variant.
//!
//! Numeric promotion order is Int -> Decimal -> Float. Integer overflow
//! promotes to Decimal, Decimal overflow promotes to Float.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single value read from a data row or produced by aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Int(i64),
    Decimal(Decimal),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Returns true for Int, Decimal and Float.
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Decimal(_) | CellValue::Float(_))
    }

    /// Numeric value as f64. None for Text and Boolean.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Decimal(d) => d.to_f64(),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(_) | CellValue::Boolean(_) => None,
        }
    }

    /// Exact numeric value. Floats are not converted here so that a Float
    /// operand always keeps the whole operation in Float.
    fn as_exact(&self) -> Option<Decimal> {
        match self {
            CellValue::Int(i) => Some(Decimal::from(*i)),
            CellValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    fn involves_float(&self, other: &CellValue) -> bool {
        matches!(self, CellValue::Float(_)) || matches!(other, CellValue::Float(_))
    }

    /// Adds two numeric values using the promotion rules.
    /// Returns None when either side is not numeric.
    pub fn add(&self, other: &CellValue) -> Option<CellValue> {
        if let (CellValue::Int(a), CellValue::Int(b)) = (self, other) {
            return Some(match a.checked_add(*b) {
                Some(sum) => CellValue::Int(sum),
                None => CellValue::Decimal(Decimal::from(*a) + Decimal::from(*b)),
            });
        }
        if self.involves_float(other) {
            return Some(CellValue::Float(self.as_f64()? + other.as_f64()?));
        }
        let (a, b) = (self.as_exact()?, other.as_exact()?);
        Some(match a.checked_add(b) {
            Some(sum) => CellValue::Decimal(sum),
            None => CellValue::Float(a.to_f64()? + b.to_f64()?),
        })
    }

    /// Divides two numeric values. Integer and Decimal operands divide
    /// exactly as Decimal. A zero divisor yields None rather than an
    /// infinity or NaN.
    pub fn div(&self, other: &CellValue) -> Option<CellValue> {
        if self.involves_float(other) {
            let (a, b) = (self.as_f64()?, other.as_f64()?);
            if b == 0.0 {
                return None;
            }
            return Some(CellValue::Float(a / b));
        }
        let (a, b) = (self.as_exact()?, other.as_exact()?);
        if b.is_zero() {
            return None;
        }
        match a.checked_div(b) {
            Some(q) => Some(CellValue::Decimal(q)),
            None => Some(CellValue::Float(a.to_f64()? / b.to_f64()?)),
        }
    }

    /// Natural ordering. Numbers compare across subtypes, text compares
    /// lexically, booleans false < true. Mixed kinds have no ordering.
    pub fn compare(&self, other: &CellValue) -> Option<Ordering> {
        match (self, other) {
            (CellValue::Int(a), CellValue::Int(b)) => Some(a.cmp(b)),
            (CellValue::Text(a), CellValue::Text(b)) => Some(a.cmp(b)),
            (CellValue::Boolean(a), CellValue::Boolean(b)) => Some(a.cmp(b)),
            _ if self.involves_float(other) => self.as_f64()?.partial_cmp(&other.as_f64()?),
            _ => Some(self.as_exact()?.cmp(&other.as_exact()?)),
        }
    }

    /// Value equality used for grouping: Int(5), Decimal(5) and Float(5.0)
    /// are the same group.
    pub fn same_value(&self, other: &CellValue) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    /// Hashable key with the same equality as `same_value` for numbers.
    /// Int and Decimal key exactly; a Float shares their key only when it
    /// converts to a Decimal and back without loss.
    pub fn distinct_key(&self) -> ValueKey {
        match self {
            CellValue::Int(i) => ValueKey::Exact(Decimal::from(*i).normalize()),
            CellValue::Decimal(d) => ValueKey::Exact(d.normalize()),
            CellValue::Float(f) => match Decimal::from_f64(*f) {
                Some(d) if d.to_f64() == Some(*f) => ValueKey::Exact(d.normalize()),
                _ => ValueKey::Number(OrderedFloat(*f)),
            },
            CellValue::Text(s) => ValueKey::Text(s.clone()),
            CellValue::Boolean(b) => ValueKey::Boolean(*b),
        }
    }

    /// Returns the display value as a String.
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Int(i) => i.to_string(),
            CellValue::Decimal(d) => d.normalize().to_string(),
            CellValue::Float(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }

    /// Truthiness used by row filters: true, non-zero numbers and the text
    /// "true" (any case) pass.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Boolean(b) => *b,
            CellValue::Text(s) => s.eq_ignore_ascii_case("true"),
            _ => self.as_f64().map(|n| n != 0.0).unwrap_or(false),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Decimal(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

// ============================================================================
// HASHABLE KEYS
// ============================================================================

/// A normalized, hashable representation of a cell value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Exact(Decimal),
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
}

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // -0.0 == 0.0, so they must hash alike
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_addition_stays_int() {
        let sum = CellValue::Int(2).add(&CellValue::Int(3));
        assert_eq!(sum, Some(CellValue::Int(5)));
    }

    #[test]
    fn test_int_overflow_promotes_to_decimal() {
        let sum = CellValue::Int(i64::MAX).add(&CellValue::Int(1)).unwrap();
        assert_eq!(sum, CellValue::Decimal(Decimal::from(i64::MAX) + Decimal::ONE));
    }

    #[test]
    fn test_decimal_and_int_promote_to_decimal() {
        let sum = CellValue::Decimal(Decimal::new(12345, 2))
            .add(&CellValue::Int(1))
            .unwrap();
        assert_eq!(sum, CellValue::Decimal(Decimal::new(12445, 2)));
    }

    #[test]
    fn test_float_wins_promotion() {
        let sum = CellValue::Decimal(Decimal::new(15, 1))
            .add(&CellValue::Float(0.5))
            .unwrap();
        assert_eq!(sum, CellValue::Float(2.0));
    }

    #[test]
    fn test_add_text_is_none() {
        assert!(CellValue::Int(1).add(&CellValue::text("a")).is_none());
    }

    #[test]
    fn test_integer_division_is_exact() {
        let q = CellValue::Int(3).div(&CellValue::Int(2)).unwrap();
        assert_eq!(q, CellValue::Decimal(Decimal::new(15, 1)));
    }

    #[test]
    fn test_division_by_zero_is_none() {
        assert!(CellValue::Int(3).div(&CellValue::Int(0)).is_none());
        assert!(CellValue::Float(3.0).div(&CellValue::Float(0.0)).is_none());
    }

    #[test]
    fn test_cross_type_compare() {
        assert_eq!(
            CellValue::Int(2).compare(&CellValue::Float(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            CellValue::Decimal(Decimal::new(20, 1)).compare(&CellValue::Int(2)),
            Some(Ordering::Equal)
        );
        assert!(CellValue::Int(1).compare(&CellValue::text("1")).is_none());
    }

    #[test]
    fn test_same_value_across_subtypes() {
        assert!(CellValue::Int(5).same_value(&CellValue::Float(5.0)));
        assert_eq!(
            CellValue::Int(5).distinct_key(),
            CellValue::Float(5.0).distinct_key()
        );
    }

    #[test]
    fn test_distinct_key_keeps_large_integers_apart() {
        let a = CellValue::Int(9_007_199_254_740_992);
        let b = CellValue::Int(9_007_199_254_740_993);
        assert!(!a.same_value(&b));
        assert_ne!(a.distinct_key(), b.distinct_key());
        assert_eq!(
            CellValue::Decimal(Decimal::new(50, 1)).distinct_key(),
            CellValue::Int(5).distinct_key()
        );
        assert_eq!(
            CellValue::Float(f64::NAN).distinct_key(),
            CellValue::Float(f64::NAN).distinct_key()
        );
    }

    #[test]
    fn test_display_value() {
        assert_eq!(CellValue::Float(42.0).display_value(), "42");
        assert_eq!(CellValue::Float(1.5).display_value(), "1.5");
        assert_eq!(CellValue::Decimal(Decimal::new(14480, 2)).display_value(), "144.8");
        assert_eq!(CellValue::Boolean(true).display_value(), "TRUE");
    }

    #[test]
    fn test_truthiness() {
        assert!(CellValue::Boolean(true).is_truthy());
        assert!(CellValue::Int(2).is_truthy());
        assert!(!CellValue::Int(0).is_truthy());
        assert!(!CellValue::text("no").is_truthy());
    }
}
