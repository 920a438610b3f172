// Central Error Type for the Application

use thiserror::Error;

use crate::domain::parser::ParseError;

/// Application-level error type
///
/// Every failure kind of a measurement cycle is a distinct variant so that
/// callers can tell "the test failed to run" apart from "the test ran but
/// could not be saved". Nothing is downgraded to a generic failure.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to start measurement utility: {0}")]
    Spawn(String),

    #[error("Measurement utility exited with code {code}: {stderr}", code = exit_code_display(.exit_code))]
    Process {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Measurement utility timed out after {0}ms")]
    Timeout(u64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        // No exit code means the process was terminated by a signal
        None => "<signal>".to_string(),
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// From implementation for infra crates (to avoid circular dependency)
impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Storage(err)
    }
}

// Note: sqlx::Error conversion is handled in infra-sqlite
// by converting to AppError::Storage(String)
