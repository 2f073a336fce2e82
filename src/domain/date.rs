use chrono::NaiveDate;
use std::fmt;

// Digit positions are `d`; everything else must match exactly.
const ISO_DATE_SHAPE: &[u8; 10] = b"dddd-dd-dd";

/// True when `input` follows `YYYY-MM-DD` character by character, for as many
/// characters as it has. Values longer than a full date never match.
fn matches_date_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() <= ISO_DATE_SHAPE.len()
        && bytes.iter().zip(ISO_DATE_SHAPE).all(|(&b, &shape)| match shape {
            b'd' => b.is_ascii_digit(),
            other => b == other,
        })
}

/// Parse a strict, zero-padded `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    if input.len() != ISO_DATE_SHAPE.len() || !matches_date_shape(input) {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// Leading part of an ISO date used to restrict summaries:
/// `2025` selects a year, `2025-10` a month, `2025-10-01` a single day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatePrefix(String);

impl DatePrefix {
    pub fn parse(input: &str) -> Result<Self, ParseDatePrefixError> {
        if input.is_empty() || !matches_date_shape(input) {
            return Err(ParseDatePrefixError);
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DatePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDatePrefixError;

impl fmt::Display for ParseDatePrefixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a YYYY-MM-DD date prefix")
    }
}

impl std::error::Error for ParseDatePrefixError {}
