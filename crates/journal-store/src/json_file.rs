use crate::error::StoreError;
use crate::store::{Snapshot, TradeStore, insert_front, remove, replace};
use core_types::{Trade, TradeId};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A journal persisted as a single JSON array of trades.
///
/// The whole file is read once on open. Every mutation rewrites it through a
/// temporary sibling file that is renamed into place, and the in-memory copy
/// only changes once the write succeeded.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    trades: Snapshot,
}

impl JsonFileStore {
    /// Opens the journal at `path`. A missing file is an empty journal.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let trades = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<Trade>>(&raw)?
            }
        } else {
            tracing::info!(path = %path.display(), "Journal file not found, starting an empty journal.");
            Vec::new()
        };

        tracing::debug!(path = %path.display(), trades = trades.len(), "Loaded journal.");
        Ok(Self {
            path,
            trades: Arc::new(trades),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the journal, persists it, then publishes it.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut Vec<Trade>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut next = self.trades.as_ref().clone();
        let outcome = change(&mut next)?;
        self.persist(&next)?;
        self.trades = Arc::new(next);
        Ok(outcome)
    }

    fn persist(&self, trades: &[Trade]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let body = serde_json::to_string_pretty(trades)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(io_err)?;
        if let Err(source) = fs::rename(&staging, &self.path) {
            if let Err(e) = fs::remove_file(&staging) {
                tracing::warn!(path = %staging.display(), error = %e, "Failed to remove staging file.");
            }
            return Err(io_err(source));
        }
        Ok(())
    }
}

impl TradeStore for JsonFileStore {
    fn list_trades(&self) -> Snapshot {
        Arc::clone(&self.trades)
    }

    fn add(&mut self, trade: Trade) -> Result<(), StoreError> {
        let id = trade.id.clone();
        self.commit(|trades| insert_front(trades, trade))?;
        tracing::info!(%id, "Trade recorded.");
        Ok(())
    }

    fn update(&mut self, trade: Trade) -> Result<(), StoreError> {
        let id = trade.id.clone();
        self.commit(|trades| replace(trades, trade))?;
        tracing::info!(%id, "Trade updated.");
        Ok(())
    }

    fn delete(&mut self, id: &TradeId) -> Result<Trade, StoreError> {
        let removed = self.commit(|trades| remove(trades, id))?;
        tracing::info!(%id, "Trade deleted.");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_file_is_an_empty_journal() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("trades.json")).unwrap();
        assert!(store.list_trades().is_empty());
    }

    #[test]
    fn mutations_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("trades.json");

        let first = sample("EURUSD", dec!(50));
        let second = sample("BTCUSD", dec!(-20));
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.add(first.clone()).unwrap();
            store.add(second.clone()).unwrap();

            let mut edited = first.clone();
            edited.result = dec!(75);
            store.update(edited).unwrap();
        }

        let mut reopened = JsonFileStore::open(&path).unwrap();
        let trades = reopened.list_trades();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].id, second.id);
        assert_eq!(trades[1].result, dec!(75));

        reopened.delete(&second.id).unwrap();
        let again = JsonFileStore::open(&path).unwrap();
        assert_eq!(again.list_trades().len(), 1);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn failed_mutation_leaves_the_journal_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.json");
        let mut store = JsonFileStore::open(&path).unwrap();

        let stranger = sample("EURUSD", dec!(1));
        assert!(matches!(store.update(stranger), Err(StoreError::NotFound(_))));
        assert!(store.list_trades().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn failed_rename_cleans_up_the_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.json");
        let mut store = JsonFileStore::open(&path).unwrap();

        // A directory in place of the journal makes the final rename fail.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let err = store.add(sample("EURUSD", dec!(5))).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!path.with_extension("json.tmp").exists());
        assert!(store.list_trades().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Json(_))));
    }

    #[test]
    fn reads_journals_written_by_the_web_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.json");
        fs::write(
            &path,
            r#"[{"id":"1714000000000","operationType":"buy","asset":"EURUSD","lots":0.5,
                 "entryPrice":1.07,"stopLoss":1.065,"takeProfit":1.08,"result":120.5,
                 "reasons":["rompimento","tendencia"],"description":"clean break",
                 "date":"2024-04-25","time":"14:05",
                 "createdAt":"2024-04-25T14:06:00.000Z","updatedAt":"2024-04-25T14:06:00.000Z"}]"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        let trade = store.get(&TradeId::from("1714000000000")).unwrap();
        assert_eq!(trade.result, dec!(120.5));
        assert_eq!(trade.reasons.len(), 2);
    }
}
