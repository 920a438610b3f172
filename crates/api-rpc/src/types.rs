//! RPC Request/Response Types

use serde::{Deserialize, Serialize};
use speedwatch_core::domain::MeasurementRecord;

/// One measurement as serialized over the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementRecordDto {
    pub id: i64,
    /// Epoch milliseconds
    pub measured_at: i64,
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub ping_ms: f64,
}

impl From<MeasurementRecord> for MeasurementRecordDto {
    fn from(record: MeasurementRecord) -> Self {
        Self {
            id: record.id,
            measured_at: record.measured_at,
            download_mbps: record.download_mbps,
            upload_mbps: record.upload_mbps,
            ping_ms: record.ping_ms,
        }
    }
}

/// speedtest.run.v1 - result of one full measurement cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSpeedTestResponse {
    pub record: MeasurementRecordDto,
}

/// speedtest.history.v1 - all records, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub records: Vec<MeasurementRecordDto>,
}
