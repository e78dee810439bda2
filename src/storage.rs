use crate::market::{NewsItem, Security};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::PathBuf;

const STOCKS_FILE: &str = "stocks.json";
const NEWS_FILE: &str = "news.json";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Format(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "Snapshot I/O error: {e}"),
            StorageError::Format(e) => write!(f, "Snapshot format error: {e}"),
        }
    }
}

impl Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::Io(error)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::Format(error)
    }
}

/// Flat-file persistence for the two snapshot record sets.
///
/// The ingest binary writes them, the bot reads them once at startup;
/// nothing rewrites a snapshot in place while the bot is serving.
pub struct SnapshotStorage {
    data_dir: PathBuf,
}

impl SnapshotStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Data directory from DATA_DIR, defaulting to ./data
    pub fn from_env() -> Self {
        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
        Self::new(data_dir)
    }

    pub fn load_securities(&self) -> Result<Vec<Security>, StorageError> {
        self.load(STOCKS_FILE)
    }

    pub fn load_news(&self) -> Result<Vec<NewsItem>, StorageError> {
        self.load(NEWS_FILE)
    }

    pub fn save_securities(&self, records: &[Security]) -> Result<(), StorageError> {
        self.save(STOCKS_FILE, records)
    }

    pub fn save_news(&self, records: &[NewsItem]) -> Result<(), StorageError> {
        self.save(NEWS_FILE, records)
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StorageError> {
        let path = self.data_dir.join(file);
        let raw = fs::read_to_string(&path)?;
        let records: Vec<T> = serde_json::from_str(&raw)?;
        info!("📂 {}: {} records loaded", path.display(), records.len());
        Ok(records)
    }

    fn save<T: Serialize>(&self, file: &str, records: &[T]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.data_dir.join(file);
        fs::write(&path, serde_json::to_string_pretty(records)?)?;
        info!("💾 {}: {} records saved", path.display(), records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage(label: &str) -> SnapshotStorage {
        let dir = std::env::temp_dir()
            .join("moex_news_bot_tests")
            .join(format!("{label}_{}", std::process::id()));
        SnapshotStorage::new(dir)
    }

    #[test]
    fn test_snapshot_round_trip() {
        let storage = temp_storage("round_trip");
        let securities = vec![Security {
            ticker: "GAZP".to_string(),
            name: "Газпром".to_string(),
            price: 150.0,
        }];

        storage.save_securities(&securities).unwrap();
        let loaded = storage.load_securities().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].ticker, "GAZP");
        assert_eq!(loaded[0].price, 150.0);
    }

    #[test]
    fn test_missing_snapshot_is_an_io_error() {
        let storage = temp_storage("missing");
        assert!(matches!(storage.load_news(), Err(StorageError::Io(_))));
    }
}
