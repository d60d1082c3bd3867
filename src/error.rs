use std::io;

use thiserror::Error;

/// Errors returned by the loader, the query engine and the config layer.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("no record in the result has a usable location")]
    NoLocation,
    #[error("not enough records to sample: {available} available, {required} required")]
    InsufficientData { available: usize, required: usize },
    #[error("could not load dataset: {0}")]
    DataLoad(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed record on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
