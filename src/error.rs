//! Error types for rowgate.
//!
//! Begin/execute/commit errors are fatal to the whole batch: they are
//! never retried and never collected per-item.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("beginning transaction: {0}")]
    BeginTransaction(String),

    #[error("inserting item {id}: {reason}")]
    Execute { id: i32, reason: String },

    #[error("committing transaction: {0}")]
    Commit(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
