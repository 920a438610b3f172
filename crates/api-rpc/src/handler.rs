//! RPC Method Handlers
//!
//! Thin layer over the measurement service: rate limiting, error mapping,
//! wire-type conversion.

use std::sync::Arc;

use jsonrpsee::types::ErrorObjectOwned;
use speedwatch_core::application::MeasurementService;

use crate::error::{code, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{HistoryResponse, MeasurementRecordDto, RunSpeedTestResponse};

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<MeasurementService>,
    rate_limiter: Arc<RateLimiter>,
}

impl RpcHandler {
    pub fn new(service: Arc<MeasurementService>) -> Self {
        // Runs are expensive (subprocess + saturated link): low defaults,
        // env-overridable
        let max_burst: u32 = std::env::var("SPEEDWATCH_RATE_LIMIT_BURST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let rate_per_sec: u32 = std::env::var("SPEEDWATCH_RATE_LIMIT_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        Self {
            service,
            rate_limiter: Arc::new(RateLimiter::new(max_burst, rate_per_sec)),
        }
    }

    /// speedtest.run.v1
    pub async fn run_speed_test(&self) -> Result<RunSpeedTestResponse, ErrorObjectOwned> {
        if !self.rate_limiter.check().await {
            return Err(ErrorObjectOwned::owned(
                code::THROTTLED,
                "Rate limit exceeded. Please slow down.",
                None::<()>,
            ));
        }

        let record = self.service.run().await.map_err(to_rpc_error)?;

        Ok(RunSpeedTestResponse {
            record: record.into(),
        })
    }

    /// speedtest.history.v1
    pub async fn history(&self) -> Result<HistoryResponse, ErrorObjectOwned> {
        let records = self.service.history().await.map_err(to_rpc_error)?;

        Ok(HistoryResponse {
            records: records.into_iter().map(MeasurementRecordDto::from).collect(),
        })
    }
}
