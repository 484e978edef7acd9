//! Error types

use thiserror::Error;

/// Common error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("missing {fragment} for item at time position {time_position}")]
    MissingElement {
        time_position: u64,
        fragment: &'static str,
    },

    #[error("engaged item {label:?} has no time position")]
    MissingTimePosition { label: String },

    #[error("page has no {0} field")]
    MissingPageField(&'static str),

    #[error("embedded metadata is not valid JSON: {0}")]
    MalformedMetadata(#[source] serde_json::Error),

    #[error("no items are engaged for export")]
    NoEngagedItems,

    #[error("could not deliver {file_name}: {reason}")]
    Delivery { file_name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Excel error: {0}")]
    Excel(String),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;
