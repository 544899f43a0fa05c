//! Value comparison for filter operands
//!
//! Every comparison has four outcomes. `Incomparable` is produced for
//! missing, null, mistyped or malformed operands and makes every comparison
//! operator evaluate to false, so evaluation never has to fail.

use std::borrow::Cow;
use std::cmp::Ordering;
use tablestore_core::PropertyValue;
use tablestore_core::encoding::{encode_guid, hex_to_base64, is_raw_guid};
use tablestore_core::temporal::timestamp_millis;

/// Outcome of comparing two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    Equal,
    Greater,
    Incomparable,
}

impl Comparison {
    /// Swap the sides of the comparison
    pub fn reverse(self) -> Self {
        match self {
            Comparison::Less => Comparison::Greater,
            Comparison::Greater => Comparison::Less,
            other => other,
        }
    }

    pub fn from_partial(ordering: Option<Ordering>) -> Self {
        ordering.map_or(Comparison::Incomparable, Comparison::from)
    }
}

impl From<Ordering> for Comparison {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Comparison::Less,
            Ordering::Equal => Comparison::Equal,
            Ordering::Greater => Comparison::Greater,
        }
    }
}

/// Compare strings, booleans and plain numbers.
///
/// Values of different kinds never compare.
pub fn compare_values(left: Option<&PropertyValue>, right: Option<&PropertyValue>) -> Comparison {
    match (left, right) {
        (Some(PropertyValue::Boolean(a)), Some(PropertyValue::Boolean(b))) => a.cmp(b).into(),
        (Some(PropertyValue::Number(a)), Some(PropertyValue::Number(b))) => {
            Comparison::from_partial(a.partial_cmp(b))
        }
        (Some(PropertyValue::String(a)), Some(PropertyValue::String(b))) => a.cmp(b).into(),
        _ => Comparison::Incomparable,
    }
}

/// Compare a `123L` literal with an operand, as arbitrary precision decimals
pub fn compare_big_numbers(literal: &str, other: Option<&PropertyValue>) -> Comparison {
    let other = match (
        other.and_then(PropertyValue::as_str),
        other.and_then(PropertyValue::as_number),
    ) {
        (Some(digits), _) => Cow::Borrowed(digits),
        (None, Some(n)) if n.is_finite() => Cow::Owned(n.to_string()),
        _ => return Comparison::Incomparable,
    };

    match (Decimal::parse(literal), Decimal::parse(&other)) {
        (Some(a), Some(b)) => a.compare(&b).into(),
        _ => Comparison::Incomparable,
    }
}

/// Compare a `datetime'...'` literal with an operand at millisecond resolution
pub fn compare_datetimes(literal: &str, other: Option<&PropertyValue>) -> Comparison {
    let Some(other) = other.and_then(PropertyValue::as_str) else {
        return Comparison::Incomparable;
    };

    match (timestamp_millis(literal), timestamp_millis(other)) {
        (Some(a), Some(b)) => a.cmp(&b).into(),
        _ => Comparison::Incomparable,
    }
}

/// Compare a `guid'...'` literal with a stored Guid.
///
/// The stored value is either the base64 encoding of the GUID text or, for
/// entities written by older stores, the raw hyphenated GUID.
pub fn compare_guids(literal: &str, other: Option<&PropertyValue>) -> Comparison {
    let Some(other) = other.and_then(PropertyValue::as_str).filter(|s| !s.is_empty()) else {
        return Comparison::Incomparable;
    };

    if is_raw_guid(other) {
        literal
            .to_ascii_lowercase()
            .cmp(&other.to_ascii_lowercase())
            .into()
    } else {
        encode_guid(literal).as_str().cmp(other).into()
    }
}

/// Compare a `binary'...'` (hex) literal with stored base64 binary data
pub fn compare_binary(literal: &str, other: Option<&PropertyValue>) -> Comparison {
    let Some(other) = other.and_then(PropertyValue::as_str) else {
        return Comparison::Incomparable;
    };

    match hex_to_base64(literal) {
        Some(encoded) => encoded.as_str().cmp(other).into(),
        None => Comparison::Incomparable,
    }
}

/// A signed decimal held as digit strings
#[derive(Debug)]
struct Decimal<'a> {
    negative: bool,
    /// Integer digits without leading zeros
    integer: &'a str,
    /// Fraction digits without trailing zeros
    fraction: &'a str,
}

impl<'a> Decimal<'a> {
    fn parse(value: &'a str) -> Option<Self> {
        let (negative, digits) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };

        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if integer.is_empty() || !is_digits(integer) || !is_digits(fraction) {
            return None;
        }
        if digits.contains('.') && fraction.is_empty() {
            return None;
        }

        Some(Self {
            negative,
            integer: integer.trim_start_matches('0'),
            fraction: fraction.trim_end_matches('0'),
        })
    }

    fn is_zero(&self) -> bool {
        self.integer.is_empty() && self.fraction.is_empty()
    }

    fn compare_magnitude(&self, other: &Self) -> Ordering {
        self.integer
            .len()
            .cmp(&other.integer.len())
            .then_with(|| self.integer.cmp(other.integer))
            .then_with(|| self.fraction.cmp(other.fraction))
    }

    fn compare(&self, other: &Self) -> Ordering {
        // -0 and 0 are the same number
        if self.is_zero() && other.is_zero() {
            return Ordering::Equal;
        }

        match (self.negative && !self.is_zero(), other.negative && !other.is_zero()) {
            (false, false) => self.compare_magnitude(other),
            (true, true) => other.compare_magnitude(self),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}
