// Measurement Repository Port (Interface)

use crate::domain::{MeasurementRecord, MeasurementResult};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for measurement persistence
///
/// Implementations must assign the new unique id atomically with making the
/// row visible, and a completed insert must be visible to a subsequent
/// `list_newest_first` call (read-your-writes).
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Insert a measurement verbatim (the result's own timestamp is
    /// authoritative) and return the stored record with its assigned id
    async fn insert(&self, result: &MeasurementResult) -> Result<MeasurementRecord>;

    /// All records ordered by timestamp descending (most recent first).
    /// Empty store yields an empty vec, never an error.
    async fn list_newest_first(&self) -> Result<Vec<MeasurementRecord>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// In-memory repository for tests. Assigns sequential ids and sorts reads
    /// by timestamp descending like the real adapter.
    #[derive(Default)]
    pub struct InMemoryRepository {
        rows: Mutex<Vec<MeasurementRecord>>,
        fail_inserts: bool,
    }

    impl InMemoryRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Repository whose inserts always fail (storage failure path)
        pub fn failing() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail_inserts: true,
            }
        }

        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl MeasurementRepository for InMemoryRepository {
        async fn insert(&self, result: &MeasurementResult) -> Result<MeasurementRecord> {
            if self.fail_inserts {
                return Err(AppError::Storage("insert rejected (mock)".to_string()));
            }

            let mut rows = self.rows.lock().unwrap();
            let record = MeasurementRecord {
                id: rows.len() as i64 + 1,
                download_mbps: result.download_mbps,
                upload_mbps: result.upload_mbps,
                ping_ms: result.ping_ms,
                measured_at: result.measured_at,
            };
            rows.push(record.clone());
            Ok(record)
        }

        async fn list_newest_first(&self) -> Result<Vec<MeasurementRecord>> {
            let mut rows = self.rows.lock().unwrap().clone();
            rows.sort_by(|a, b| b.measured_at.cmp(&a.measured_at).then(b.id.cmp(&a.id)));
            Ok(rows)
        }
    }
}
