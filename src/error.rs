use thiserror::Error;

use crate::ui::Phase;

/// Failure fetching or decoding a single catalog resource
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} not found")]
    NotFound { url: String },

    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error during {operation}: {source}")]
    Sqlite {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("constraint violated on {table}: {source}")]
    ConstraintViolation {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("invalid schema: {0}")]
    Schema(String),
}

impl StoreError {
    pub(crate) fn sqlite(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StoreError::Sqlite { operation, source }
    }
}

/// Failure ingesting one unit (subject, ability, move, chain...)
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid catalog reference: {0}")]
    InvalidReference(String),
}

/// Failure that aborts a whole run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{phase} failed: {source}")]
    Fatal {
        phase: Phase,
        #[source]
        source: IngestError,
    },
}

impl PipelineError {
    pub fn fatal(phase: Phase) -> impl FnOnce(IngestError) -> Self {
        move |source| PipelineError::Fatal { phase, source }
    }
}
