// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for the identifier worker

use thiserror::Error;

/// Result type alias for identifier operations
pub type Result<T> = std::result::Result<T, IdentifierError>;

/// Identifier error types
///
/// These cover the coordinator side and local plumbing. Failures of the
/// identification tools themselves are [`crate::tools::ToolError`] and end
/// up as data inside the result instead.
#[derive(Error, Debug)]
pub enum IdentifierError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Coordinator {operation} failed with status {status}: {body}")]
    Coordinator {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),
}

impl From<minijinja::Error> for IdentifierError {
    fn from(e: minijinja::Error) -> Self {
        IdentifierError::Render(e.to_string())
    }
}
