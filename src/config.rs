use std::net::SocketAddr;
use std::path::PathBuf;

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "cashbook.db";

/// Default address the HTTP server binds to.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Process-wide configuration, resolved once at startup and passed into constructors.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

/// Where the entries table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl StorageConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_PATH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Directory with the bundled front-end, served for any non-API path
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            static_dir: None,
        }
    }
}
