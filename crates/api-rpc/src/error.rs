//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes. Every failure kind keeps
//! its own code so the presentation layer can tell "test failed to run" apart
//! from "test ran but could not be saved".

use jsonrpsee::types::ErrorObjectOwned;
use speedwatch_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const THROTTLED: i32 = 4003;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const STORAGE_ERROR: i32 = 5001;
    pub const SPAWN_ERROR: i32 = 5010;
    pub const PROCESS_ERROR: i32 = 5011;
    pub const PARSE_ERROR: i32 = 5012;
    pub const TIMEOUT_ERROR: i32 = 5013;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = match &err {
        AppError::Spawn(_) => code::SPAWN_ERROR,
        AppError::Process { .. } => code::PROCESS_ERROR,
        AppError::Parse(_) => code::PARSE_ERROR,
        AppError::Timeout(_) => code::TIMEOUT_ERROR,
        AppError::Storage(_) => code::STORAGE_ERROR,
        AppError::Config(_) | AppError::Internal(_) => code::INTERNAL_ERROR,
    };

    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}
