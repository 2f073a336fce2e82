use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;

use crate::config::StorageConfig;
use crate::domain::{DatePrefix, Entry, EntryFilter, EntryType, NewEntry};

use super::MIGRATION_001_ENTRIES;

const DATE_FORMAT: &str = "%Y-%m-%d";

const ENTRY_COLUMNS: &str = "id, type, amount, category, date, note, created_at";

/// Repository for persisting and querying cashbook entries.
///
/// Every call borrows a pooled connection for its own duration only.
/// Writes run in a transaction that commits on success; any early return
/// drops the transaction, which rolls it back before the connection is released.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database described by `config`.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| {
                format!(
                    "Failed to open database at {}",
                    config.database_path.display()
                )
            })?;
        Ok(Self::new(pool))
    }

    /// Ensure the entries table exists. Safe to call any number of times.
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_ENTRIES)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + create schema).
    pub async fn init(config: &StorageConfig) -> Result<Self> {
        let repo = Self::connect(config).await?;
        repo.initialize().await?;
        Ok(repo)
    }

    /// Persist a new entry and return it with its assigned id and timestamp.
    pub async fn insert(&self, entry: &NewEntry) -> Result<Entry> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO entries (type, amount, category, date, note, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(entry.entry_type.as_str())
        .bind(entry.amount)
        .bind(&entry.category)
        .bind(entry.date.format(DATE_FORMAT).to_string())
        .bind(&entry.note)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert entry")?;

        let stored = Self::row_to_entry(&row)?;
        tx.commit().await.context("Failed to commit entry")?;

        Ok(stored)
    }

    /// List entries matching every supplied filter, newest date first.
    pub async fn query(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let mut query = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE 1=1");

        let start_str = filter.start_date.map(|d| d.format(DATE_FORMAT).to_string());
        let end_str = filter.end_date.map(|d| d.format(DATE_FORMAT).to_string());

        if filter.entry_type.is_some() {
            query.push_str(" AND type = ?");
        }
        if start_str.is_some() {
            query.push_str(" AND date >= ?");
        }
        if end_str.is_some() {
            query.push_str(" AND date <= ?");
        }

        query.push_str(" ORDER BY date DESC, id DESC LIMIT ?");

        let mut sql_query = sqlx::query(&query);

        if let Some(entry_type) = filter.entry_type {
            sql_query = sql_query.bind(entry_type.as_str());
        }
        if let Some(ref start) = start_str {
            sql_query = sql_query.bind(start);
        }
        if let Some(ref end) = end_str {
            sql_query = sql_query.bind(end);
        }
        sql_query = sql_query.bind(i64::from(filter.limit));

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// Sum amounts per entry type, optionally restricted to dates starting with `prefix`.
    /// Returns `(total_income, total_expense)`; a type with no entries sums to zero.
    pub async fn aggregate(&self, prefix: Option<&DatePrefix>) -> Result<(f64, f64)> {
        let mut query = String::from("SELECT type, COALESCE(SUM(amount), 0.0) AS total FROM entries");
        if prefix.is_some() {
            query.push_str(" WHERE substr(date, 1, ?) = ?");
        }
        query.push_str(" GROUP BY type");

        let mut sql_query = sqlx::query(&query);
        if let Some(prefix) = prefix {
            sql_query = sql_query.bind(prefix.len() as i64).bind(prefix.as_str());
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to aggregate entries")?;

        let mut total_income = 0.0;
        let mut total_expense = 0.0;
        for row in rows {
            let type_str: String = row.get("type");
            let total: f64 = row.get("total");
            match EntryType::from_str(&type_str) {
                Some(EntryType::Income) => total_income = total,
                Some(EntryType::Expense) => total_expense = total,
                None => anyhow::bail!("Invalid entry type in storage: {}", type_str),
            }
        }

        Ok((total_income, total_expense))
    }

    /// Every stored entry in insertion order.
    pub async fn all_entries(&self) -> Result<Vec<Entry>> {
        let rows = sqlx::query(&format!("SELECT {ENTRY_COLUMNS} FROM entries ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to load entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// Number of stored entries.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM entries")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count entries")?
            .get("count");
        Ok(count)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_entry(row: &SqliteRow) -> Result<Entry> {
        let type_str: String = row.get("type");
        let date_str: String = row.get("date");
        let created_at_str: String = row.get("created_at");

        Ok(Entry {
            id: row.get("id"),
            entry_type: EntryType::from_str(&type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid entry type: {}", type_str))?,
            amount: row.get("amount"),
            category: row.get("category"),
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid entry date: {}", date_str))?,
            note: row.get("note"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
