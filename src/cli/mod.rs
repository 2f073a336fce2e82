use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::application::{CashbookService, EntryQuery, NewEntryRequest};
use crate::config::{Config, DEFAULT_BIND, DEFAULT_DATABASE_PATH, ServerConfig, StorageConfig};
use crate::domain::Entry;

/// Cashbook - income and expense record keeping
#[derive(Parser)]
#[command(name = "cashbook")]
#[command(about = "Record income and expense entries and summarize them by month")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "CK_DB_PATH", default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "CK_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,

        /// Directory with the front-end to serve alongside the API
        #[arg(long, env = "CK_STATIC_DIR")]
        static_dir: Option<PathBuf>,
    },

    /// Initialize the database
    Init,

    /// Record an entry
    Add {
        /// Entry type: income or expense
        entry_type: String,

        /// Amount (e.g., "50.00" or "50")
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// Date of the entry (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Category label (e.g., "delivery", "supplies")
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List entries, newest first
    List {
        /// Filter by type: income or expense
        #[arg(short = 't', long = "type")]
        entry_type: Option<String>,

        /// Earliest date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Latest date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Maximum number of entries to show (default 100)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show total income, total expense and balance
    Summary {
        /// Restrict to dates starting with this prefix (YYYY, YYYY-MM or YYYY-MM-DD)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Export all entries
    Export {
        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Resolve the process configuration from arguments and environment.
    pub fn config(&self) -> Config {
        let server = match &self.command {
            Commands::Serve { bind, static_dir } => ServerConfig {
                bind: *bind,
                static_dir: static_dir.clone(),
            },
            _ => ServerConfig::default(),
        };

        Config {
            storage: StorageConfig::new(self.database.clone()),
            server,
        }
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config();
        let service = CashbookService::init(&config.storage).await?;

        let result = execute(self.command, &service, &config).await;

        service.close().await;
        result
    }
}

/// Run one subcommand against an open service. The caller owns closing it.
async fn execute(command: Commands, service: &CashbookService, config: &Config) -> Result<()> {
    match command {
        Commands::Serve { .. } => crate::http::run(service.clone(), &config.server)
            .await
            .context("HTTP server failed"),

        Commands::Init => {
            let count = service.entry_count().await?;
            println!(
                "Database initialized: {} ({} entries)",
                config.storage.database_path.display(),
                count
            );
            Ok(())
        }

        Commands::Add {
            entry_type,
            amount,
            date,
            category,
            note,
        } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive().to_string());
            let entry = service
                .create_entry(NewEntryRequest {
                    entry_type,
                    amount,
                    category,
                    date,
                    note,
                })
                .await?;

            println!(
                "Recorded {}: {:.2} on {} (#{})",
                entry.entry_type, entry.amount, entry.date, entry.id
            );
            Ok(())
        }

        Commands::List {
            entry_type,
            start,
            end,
            limit,
        } => {
            let filter = EntryQuery {
                entry_type,
                start,
                end,
                limit: limit.map(|l| l.to_string()),
            }
            .into_filter()?;

            let entries = service.list_entries(&filter).await?;
            print_entries(&entries);
            Ok(())
        }

        Commands::Summary { month } => {
            let summary = service.summary(month.as_deref()).await?;
            if let Some(month) = month {
                println!("Summary for {}\n", month);
            }
            println!("{:<10} {:>12}", "INCOME", format!("{:.2}", summary.total_income));
            println!("{:<10} {:>12}", "EXPENSE", format!("{:.2}", summary.total_expense));
            println!("{}", "-".repeat(23));
            println!("{:<10} {:>12}", "BALANCE", format!("{:.2}", summary.balance));
            Ok(())
        }

        Commands::Export { format, output } => {
            run_export_command(service, &format, output.as_deref()).await
        }
    }
}

fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        println!("No entries found.");
        return;
    }

    println!(
        "{:<6} {:<12} {:<8} {:>12} {:<15} NOTE",
        "ID", "DATE", "TYPE", "AMOUNT", "CATEGORY"
    );
    println!("{}", "-".repeat(70));

    for entry in entries {
        println!(
            "{:<6} {:<12} {:<8} {:>12} {:<15} {}",
            entry.id,
            entry.date.to_string(),
            entry.entry_type,
            format!("{:.2}", entry.amount),
            truncate(entry.category.as_deref().unwrap_or(""), 15),
            truncate(entry.note.as_deref().unwrap_or(""), 30)
        );
    }
}

async fn run_export_command(
    service: &CashbookService,
    format: &str,
    output: Option<&std::path::Path>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        "csv" => {
            let count = exporter.export_entries_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} entries", count);
            }
        }
        "json" => {
            let snapshot = exporter.export_json(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} entries", snapshot.entries.len());
            }
        }
        _ => {
            anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format);
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
