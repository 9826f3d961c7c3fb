//! Scalar cell values.
//!
//! Rows are opaque to the engine; everything it compares or filters is first
//! reduced to a [`CellValue`] by a column accessor or a direct field lookup.

use chrono::{DateTime, SecondsFormat, Utc};
use std::cmp::Ordering;
use std::fmt;

/// A scalar value extracted from a row.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing or null value. Always sorts last.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
    /// Point in time, compared by timestamp.
    Date(DateTime<Utc>),
}

impl CellValue {
    /// Convenience constructor for text values.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// True for [`CellValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for values that make a filter entry a no-op: null and the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric coercion used by number filters.
    ///
    /// Text is parsed after trimming, booleans map to 1/0, null and dates
    /// have no numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Null | Self::Date(_) => None,
        }
    }

    /// Compare two values. This is a total order.
    ///
    /// Numbers compare numerically, text by [`collate`], dates by timestamp
    /// and booleans `false < true`. Values of different types order by type:
    /// booleans, then numbers, dates, text and finally null. Sorting collates
    /// a mixed-type column as text instead, see
    /// [`sort_rows`](crate::pipeline::sort_rows).
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => collate(a, b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }

    const fn variant_rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
            Self::Text(_) => 3,
            Self::Null => 4,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Locale-style string collation.
///
/// Primary order ignores case; strings equal under that order put the
/// lowercase form first ("a" < "A" < "b"). Remaining ties fall back to
/// code point order, so only identical strings compare equal.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    primary
        .then_with(|| {
            let uppercase = |c: char| !c.is_lowercase();
            a.chars().map(uppercase).cmp(b.chars().map(uppercase))
        })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(-3.0).to_string(), "-3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn null_displays_as_empty_string() {
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn dates_display_as_rfc3339() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(CellValue::Date(date).to_string(), "2024-03-01T12:00:00Z");
    }

    #[test]
    fn blank_values_are_null_and_empty_text() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::text("").is_blank());
        assert!(!CellValue::text(" ").is_blank());
        assert!(!CellValue::Bool(false).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn as_number_coerces_text_and_bools() {
        assert_eq!(CellValue::text(" 12 ").as_number(), Some(12.0));
        assert_eq!(CellValue::text("abc").as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), Some(1.0));
        assert_eq!(CellValue::Null.as_number(), None);
    }

    #[test]
    fn numbers_compare_numerically_not_lexically() {
        let nine = CellValue::Number(9.0);
        let ten = CellValue::Number(10.0);
        assert_eq!(nine.compare(&ten), Ordering::Less);
    }

    #[test]
    fn dates_compare_by_timestamp() {
        let early = CellValue::Date(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        let late = CellValue::Date(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(early.compare(&late), Ordering::Less);
    }

    #[test]
    fn collate_ignores_case_for_primary_order() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Zebra", "apple"), Ordering::Greater);
    }

    #[test]
    fn collate_puts_lowercase_first_on_ties() {
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("A", "a"), Ordering::Greater);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn mixed_types_order_by_type() {
        let date = CellValue::Date(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        let ordered = [
            CellValue::Bool(false),
            CellValue::Bool(true),
            CellValue::Number(-1.0),
            CellValue::Number(1e9),
            date,
            CellValue::text("0"),
            CellValue::text("apple"),
            CellValue::Null,
        ];
        for (i, a) in ordered.iter().enumerate() {
            for (j, b) in ordered.iter().enumerate() {
                assert_eq!(a.compare(b), i.cmp(&j), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn numbers_and_numeric_text_compare_transitively() {
        let nine = CellValue::Number(9.0);
        let ten = CellValue::Number(10.0);
        let ten_a = CellValue::text("10a");

        assert_eq!(nine.compare(&ten), Ordering::Less);
        assert_eq!(ten.compare(&ten_a), Ordering::Less);
        assert_eq!(nine.compare(&ten_a), Ordering::Less);
        assert_eq!(ten_a.compare(&nine), Ordering::Greater);
    }

    #[test]
    fn collate_is_antisymmetric_on_case_variants() {
        let words = ["ab", "aB", "Ab", "AB", "abc", "ABc", "b"];
        for a in words {
            for b in words {
                assert_eq!(collate(a, b), collate(b, a).reverse(), "{} vs {}", a, b);
                assert_eq!(collate(a, b) == Ordering::Equal, a == b);
            }
        }
    }
}
