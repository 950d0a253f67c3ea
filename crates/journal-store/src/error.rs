use core_types::TradeId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access the journal file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The journal file could not be read or written as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No trade with id {0} exists in the journal.")]
    NotFound(TradeId),

    #[error("A trade with id {0} already exists in the journal.")]
    DuplicateId(TradeId),
}
