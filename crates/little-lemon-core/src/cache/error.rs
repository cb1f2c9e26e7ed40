use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to prepare store location: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Background write of a freshly fetched menu failed. The version marker
/// was not advanced, so the next launch fetches again.
#[derive(Error, Debug)]
#[error("Failed to persist menu: {0}")]
pub struct PersistenceError(#[from] pub StoreError);
