use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("SOURCE_UNAVAILABLE: {0}")]
    SourceUnavailable(String),
    #[error("QUERY_FAILED: {0}")]
    QueryFailed(String),
    #[error("CONFIG: {0}")]
    Config(String),
}

pub type HistoryResult<T> = Result<T, HistoryError>;
