//! Parsing of raw menu input into primitive values.
//!
//! Blank input means "no value" everywhere; callers decide what that implies.

use projects_core::{Decimal2, DecimalParseError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    InvalidNumber(String),
    InvalidDecimal(DecimalParseError),
    Required(&'static str),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber(input) => write!(f, "{input} is not a valid number."),
            Self::InvalidDecimal(err) => write!(f, "{err}"),
            Self::Required(field) => write!(f, "{field} is required."),
        }
    }
}

impl Error for InputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDecimal(err) => Some(err),
            _ => None,
        }
    }
}

/// Trims a raw line; blank lines become `None`.
pub fn non_blank(line: &str) -> Option<String> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn parse_int(text: Option<String>) -> Result<Option<i32>, InputError> {
    text.map(|value| {
        value
            .parse::<i32>()
            .map_err(|_| InputError::InvalidNumber(value.clone()))
    })
    .transpose()
}

pub fn parse_id(text: Option<String>) -> Result<Option<i64>, InputError> {
    text.map(|value| {
        value
            .parse::<i64>()
            .map_err(|_| InputError::InvalidNumber(value.clone()))
    })
    .transpose()
}

pub fn parse_decimal(text: Option<String>) -> Result<Option<Decimal2>, InputError> {
    text.map(|value| value.parse::<Decimal2>().map_err(InputError::InvalidDecimal))
        .transpose()
}
