// Measurement Domain Model

use serde::{Deserialize, Serialize};

/// Record ID, assigned by the storage layer on insert. Never reused.
pub type RecordId = i64;

/// One completed speed measurement, before persistence.
///
/// Immutable once constructed. All three metric fields are finite and
/// positive; the parser rejects anything else, so no constructor-level
/// validation is repeated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub ping_ms: f64,
    /// Epoch milliseconds, captured when parsing completed (not at spawn time)
    pub measured_at: i64,
}

/// A persisted measurement with its storage-assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub id: RecordId,
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub ping_ms: f64,
    pub measured_at: i64,
}
