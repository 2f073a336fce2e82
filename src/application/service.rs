use crate::config::StorageConfig;
use crate::domain::{Entry, EntryFilter, Summary};
use crate::storage::Repository;

use super::{AppError, NewEntryRequest, parse_month};

/// Application service providing the cashbook operations.
/// This is the primary interface for any client (CLI, HTTP API, etc.).
#[derive(Clone)]
pub struct CashbookService {
    repo: Repository,
}

impl CashbookService {
    /// Create a new cashbook service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the configured database and make sure the schema exists.
    pub async fn init(config: &StorageConfig) -> Result<Self, AppError> {
        let repo = Repository::init(config).await?;
        tracing::debug!(path = %config.database_path.display(), "storage initialized");
        Ok(Self::new(repo))
    }

    /// Validate and record a new entry.
    pub async fn create_entry(&self, request: NewEntryRequest) -> Result<Entry, AppError> {
        let new_entry = request.validate()?;
        let entry = self.repo.insert(&new_entry).await?;
        tracing::info!(
            id = entry.id,
            entry_type = %entry.entry_type,
            amount = entry.amount,
            date = %entry.date,
            "entry recorded"
        );
        Ok(entry)
    }

    /// List entries matching the filter, newest first.
    pub async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>, AppError> {
        let entries = self.repo.query(filter).await?;
        tracing::debug!(count = entries.len(), "entries listed");
        Ok(entries)
    }

    /// Income, expense and balance, optionally for a single `YYYY-MM` month.
    pub async fn summary(&self, month: Option<&str>) -> Result<Summary, AppError> {
        let month = parse_month(month)?;
        let (total_income, total_expense) = self.repo.aggregate(month.as_ref()).await?;
        Ok(Summary::new(total_income, total_expense))
    }

    /// Every entry in the order it was recorded.
    pub async fn all_entries(&self) -> Result<Vec<Entry>, AppError> {
        Ok(self.repo.all_entries().await?)
    }

    pub async fn entry_count(&self) -> Result<i64, AppError> {
        Ok(self.repo.count().await?)
    }

    /// Release pooled connections.
    pub async fn close(&self) {
        self.repo.close().await;
    }
}
