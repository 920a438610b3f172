// Measurement Orchestrator
//
// Drives one end-to-end measurement cycle: probe -> exit check -> parse ->
// persist. Each invocation is independent; concurrent runs share nothing but
// the repository handle.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{parser, MeasurementRecord};
use crate::error::{AppError, Result};
use crate::port::{MeasurementRepository, ProbeError, SpeedTestProbe, TimeProvider};

pub struct MeasurementService {
    probe: Arc<dyn SpeedTestProbe>,
    repository: Arc<dyn MeasurementRepository>,
    time_provider: Arc<dyn TimeProvider>,
}

impl MeasurementService {
    pub fn new(
        probe: Arc<dyn SpeedTestProbe>,
        repository: Arc<dyn MeasurementRepository>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            probe,
            repository,
            time_provider,
        }
    }

    /// Run one measurement cycle and persist the result.
    ///
    /// Ordering within one invocation is strict: the subprocess has exited
    /// and both streams are fully drained before parsing begins, and parsing
    /// has succeeded before persistence is attempted. No step is retried; a
    /// user re-triggering the measurement is the retry mechanism.
    ///
    /// # Errors
    /// - AppError::Spawn / AppError::Timeout if no output could be obtained
    /// - AppError::Process on non-zero exit (includes exit code and stderr)
    /// - AppError::Parse if exit 0 but the output did not match the expected
    ///   three-line format (stderr is discarded here, it only carries
    ///   diagnostics for process-level failures)
    /// - AppError::Storage if the measurement succeeded but could not be
    ///   recorded ("measured but not recorded" is not a success)
    pub async fn run(&self) -> Result<MeasurementRecord> {
        info!("Starting speed measurement");
        let started = self.time_provider.now_millis();

        let output = self.probe.run().await.map_err(|e| match e {
            ProbeError::SpawnFailed(msg) => AppError::Spawn(msg),
            ProbeError::Timeout(ms) => AppError::Timeout(ms),
            ProbeError::Io(msg) => AppError::Internal(msg),
        })?;

        if !output.success() {
            warn!(exit_code = ?output.exit_code, "Measurement utility failed");
            return Err(AppError::Process {
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        let result = parser::parse_summary(&output.stdout, self.time_provider.as_ref())
            .map_err(|e| {
                warn!(error = %e, "Measurement output did not match expected format");
                e
            })?;

        let record = self.repository.insert(&result).await?;

        info!(
            record_id = record.id,
            duration_ms = self.time_provider.now_millis() - started,
            download_mbps = record.download_mbps,
            upload_mbps = record.upload_mbps,
            ping_ms = record.ping_ms,
            "Measurement recorded"
        );

        Ok(record)
    }

    /// All persisted measurements, most recent first
    pub async fn history(&self) -> Result<Vec<MeasurementRecord>> {
        self.repository.list_newest_first().await
    }
}
