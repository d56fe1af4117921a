// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 403 Forbidden

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Anchor element not found: {0}")]
    AnchorNotFound(String),

    #[error("No comment node follows anchor {0}")]
    CommentNotFound(String),

    #[error("Comment fragment contains no table")]
    TableNotFound,
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Required column missing from source table: {0}")]
    MissingColumn(String),

    #[error("Row {row} has {got} cells, header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Non-numeric value {value:?} in column {column} (row {row})")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Extracted table has no header row")]
    NoHeader,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No data selected")]
    EmptySelection,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
