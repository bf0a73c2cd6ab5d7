//! Fixed-point decimal with two fractional digits.
//!
//! # Responsibility
//! - Represent hours and costs without binary floating point drift.
//! - Bind to and read from SQL columns declared as `DECIMAL(7,2)`.
//!
//! # Invariants
//! - The value is held as a signed count of hundredths.
//! - Values stay within the `DECIMAL(7,2)` column range, `-99999.99..=99999.99`.
//! - Parsing never rounds: digits past the second decimal place must be zero.
//! - `Display` always renders exactly two fractional digits.

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-])?(\d*)(?:\.(\d*))?$").expect("valid decimal regex")
});

const SCALE: i64 = 100;
/// Largest magnitude a `DECIMAL(7,2)` column holds, in hundredths.
const MAX_HUNDREDTHS: i64 = 9_999_999;

/// Error returned when decimal text cannot be represented exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecimalParseError {
    /// Input is not a plain decimal number.
    Malformed(String),
    /// Input has non-zero digits beyond the second decimal place.
    TooPrecise(String),
    /// Input lies outside `-99999.99..=99999.99`.
    OutOfRange(String),
}

impl Display for DecimalParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(input) => write!(f, "{input} is not a valid decimal number."),
            Self::TooPrecise(input) => {
                write!(f, "{input} has more than two significant decimal places.")
            }
            Self::OutOfRange(input) => write!(f, "{input} is outside -99999.99..=99999.99."),
        }
    }
}

impl Error for DecimalParseError {}

/// Decimal number with scale 2 (for example `12.50`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimal2 {
    hundredths: i64,
}

impl Decimal2 {
    pub const ZERO: Self = Self { hundredths: 0 };
    pub const MAX: Self = Self {
        hundredths: MAX_HUNDREDTHS,
    };
    pub const MIN: Self = Self {
        hundredths: -MAX_HUNDREDTHS,
    };

    /// Builds a value from a raw count of hundredths (`1250` is `12.50`).
    ///
    /// Not range-checked; out-of-range values are refused when bound to SQL.
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self { hundredths }
    }

    /// Builds a whole-number value, or `None` when out of range.
    pub fn from_whole(units: i64) -> Option<Self> {
        units
            .checked_mul(SCALE)
            .map(Self::from_hundredths)
            .filter(|value| value.is_in_range())
    }

    /// Returns whether the value fits a `DECIMAL(7,2)` column.
    pub const fn is_in_range(self) -> bool {
        self.hundredths >= -MAX_HUNDREDTHS && self.hundredths <= MAX_HUNDREDTHS
    }

    pub const fn hundredths(self) -> i64 {
        self.hundredths
    }

    fn from_f64(value: f64) -> Option<Self> {
        let scaled = (value * SCALE as f64).round();
        if scaled.is_finite() && scaled.abs() <= MAX_HUNDREDTHS as f64 {
            Some(Self::from_hundredths(scaled as i64))
        } else {
            None
        }
    }
}

impl FromStr for Decimal2 {
    type Err = DecimalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let caps = DECIMAL_RE
            .captures(input)
            .ok_or_else(|| DecimalParseError::Malformed(input.to_string()))?;

        let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
        let whole = caps.get(2).map_or("", |m| m.as_str());
        let fraction = caps.get(3).map_or("", |m| m.as_str());
        if whole.is_empty() && fraction.is_empty() {
            return Err(DecimalParseError::Malformed(input.to_string()));
        }

        let (kept, dropped) = fraction.split_at(fraction.len().min(2));
        if dropped.chars().any(|c| c != '0') {
            return Err(DecimalParseError::TooPrecise(input.to_string()));
        }

        let out_of_range = || DecimalParseError::OutOfRange(input.to_string());
        let whole_value = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| out_of_range())?
        };
        let fraction_value = match kept.len() {
            0 => 0,
            1 => kept.parse::<i64>().map_err(|_| out_of_range())? * 10,
            _ => kept.parse::<i64>().map_err(|_| out_of_range())?,
        };

        let magnitude = whole_value
            .checked_mul(SCALE)
            .and_then(|value| value.checked_add(fraction_value))
            .ok_or_else(out_of_range)?;

        let value = Self::from_hundredths(if negative { -magnitude } else { magnitude });
        if !value.is_in_range() {
            return Err(out_of_range());
        }
        Ok(value)
    }
}

impl Display for Decimal2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.hundredths < 0 { "-" } else { "" };
        let magnitude = self.hundredths.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            magnitude / SCALE as u64,
            magnitude % SCALE as u64
        )
    }
}

impl ToSql for Decimal2 {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        if !self.is_in_range() {
            return Err(rusqlite::Error::ToSqlConversionFailure(Box::new(
                DecimalParseError::OutOfRange(self.to_string()),
            )));
        }
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Decimal2 {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(units) => {
                Self::from_whole(units).ok_or(FromSqlError::OutOfRange(units))
            }
            ValueRef::Real(real) => Self::from_f64(real).ok_or_else(|| {
                FromSqlError::Other(Box::new(DecimalParseError::OutOfRange(real.to_string())))
            }),
            ValueRef::Text(bytes) => {
                let text =
                    std::str::from_utf8(bytes).map_err(|err| FromSqlError::Other(Box::new(err)))?;
                text.parse()
                    .map_err(|err: DecimalParseError| FromSqlError::Other(Box::new(err)))
            }
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl Serialize for Decimal2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decimal2 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
