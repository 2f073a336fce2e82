use serde::{Deserialize, Serialize};

use crate::domain::{
    DEFAULT_LIST_LIMIT, DatePrefix, EntryFilter, EntryType, NewEntry, parse_iso_date,
};

use super::AppError;

pub const INVALID_TYPE: &str = "type must be 'income' or 'expense'";
pub const INVALID_DATE: &str = "date must be YYYY-MM-DD";
pub const INVALID_AMOUNT: &str = "amount must be a finite number";
pub const INVALID_MONTH: &str = "month must be a YYYY-MM date prefix";

/// Raw entry-creation payload, as received from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntryRequest {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    pub date: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewEntryRequest {
    /// Check the payload shape and turn it into an entry ready for storage.
    pub fn validate(self) -> Result<NewEntry, AppError> {
        let entry_type = EntryType::from_str(&self.entry_type)
            .ok_or_else(|| AppError::invalid_field(INVALID_TYPE))?;
        let date = parse_iso_date(&self.date).ok_or_else(|| AppError::invalid_field(INVALID_DATE))?;

        // No sign check; negative amounts are stored as given.
        if !self.amount.is_finite() {
            return Err(AppError::invalid_field(INVALID_AMOUNT));
        }

        Ok(NewEntry {
            entry_type,
            amount: self.amount,
            category: self.category,
            date,
            note: self.note,
        })
    }
}

/// Raw list filters, as received in a query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryQuery {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<String>,
}

impl EntryQuery {
    /// Empty values are treated as absent; anything else must parse.
    pub fn into_filter(self) -> Result<EntryFilter, AppError> {
        let entry_type = non_empty(self.entry_type)
            .map(|t| EntryType::from_str(&t).ok_or_else(|| AppError::invalid_field(INVALID_TYPE)))
            .transpose()?;
        let start_date = non_empty(self.start)
            .map(|s| parse_iso_date(&s).ok_or_else(|| AppError::invalid_field("start must be YYYY-MM-DD")))
            .transpose()?;
        let end_date = non_empty(self.end)
            .map(|s| parse_iso_date(&s).ok_or_else(|| AppError::invalid_field("end must be YYYY-MM-DD")))
            .transpose()?;
        let limit = match non_empty(self.limit) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| AppError::invalid_field("limit must be a non-negative integer"))?,
            None => DEFAULT_LIST_LIMIT,
        };

        Ok(EntryFilter {
            entry_type,
            start_date,
            end_date,
            limit,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an optional month filter. Any leading part of a `YYYY-MM-DD` date is
/// accepted, so `2025` covers the whole year. An empty value means no filter.
pub fn parse_month(month: Option<&str>) -> Result<Option<DatePrefix>, AppError> {
    month
        .filter(|m| !m.trim().is_empty())
        .map(|m| DatePrefix::parse(m).map_err(|_| AppError::invalid_field(INVALID_MONTH)))
        .transpose()
}
