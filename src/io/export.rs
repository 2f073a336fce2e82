use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::CashbookService;
use crate::domain::{Entry, Summary};

/// Full cashbook dump for the JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashbookSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub summary: Summary,
    pub entries: Vec<Entry>,
}

/// Exporter for writing cashbook entries to CSV or JSON
pub struct Exporter<'a> {
    service: &'a CashbookService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a CashbookService) -> Self {
        Self { service }
    }

    /// Export entries to CSV, one row per entry in recording order
    pub async fn export_entries_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let entries = self.service.all_entries().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "type",
            "amount",
            "category",
            "date",
            "note",
            "created_at",
        ])?;

        for entry in &entries {
            csv_writer.write_record([
                entry.id.to_string(),
                entry.entry_type.to_string(),
                entry.amount.to_string(),
                entry.category.clone().unwrap_or_default(),
                entry.date.to_string(),
                entry.note.clone().unwrap_or_default(),
                entry.created_at.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(entries.len())
    }

    /// Export every entry plus the all-time summary as a JSON snapshot
    pub async fn export_json<W: Write>(&self, mut writer: W) -> Result<CashbookSnapshot> {
        let entries = self.service.all_entries().await?;
        let summary = self.service.summary(None).await?;

        let snapshot = CashbookSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            summary,
            entries,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
