use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type EntryId = i64;

/// Default number of entries returned by a listing.
pub const DEFAULT_LIST_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money coming into the business
    Income,
    /// Money going out of the business
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }

    /// Strict parse: only the exact lowercase names are accepted.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "income" => Some(EntryType::Income),
            "expense" => Some(EntryType::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A validated entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub entry_type: EntryType,
    pub amount: f64,
    pub category: Option<String>,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl NewEntry {
    pub fn new(entry_type: EntryType, amount: f64, date: NaiveDate) -> Self {
        Self {
            entry_type,
            amount,
            category: None,
            date,
            note: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A stored cashbook entry.
///
/// Entries are append-only: once stored they are never updated or deleted,
/// so `id` and `created_at` are fixed for the lifetime of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: f64,
    pub category: Option<String>,
    /// Calendar date of the real-world event
    pub date: NaiveDate,
    pub note: Option<String>,
    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
}

/// Filter for listing entries. All supplied bounds are combined; date bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFilter {
    pub entry_type: Option<EntryType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: u32,
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self {
            entry_type: None,
            start_date: None,
            end_date: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// Income, expense and balance over a set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

impl Summary {
    pub fn new(total_income: f64, total_expense: f64) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}
