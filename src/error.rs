use thiserror::Error;

#[derive(Error, Debug)]
pub enum CataidError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("No time position {0} with an engagement toggle on this page")]
    UnknownTimePosition(u64),

    #[error("Unknown scene type checkbox: {0}")]
    UnknownCheckbox(String),

    #[error("Page has no catalog export: {0}")]
    ExportUnavailable(String),

    #[error("No valid catout files specified")]
    NoCatoutFiles,

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] cataid_common::Error),
}

pub type Result<T> = std::result::Result<T, CataidError>;
