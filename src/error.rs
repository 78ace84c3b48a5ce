use thiserror::Error;

/// Errors surfaced by the query engine.
///
/// Store-level failures (unknown column, type mismatch, connectivity) are
/// wrapped unchanged; the engine does not retry or swallow them.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("store returned a non-object row")]
    MalformedRow,
}

pub type Result<T> = std::result::Result<T, QueryError>;
