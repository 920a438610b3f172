// Port Layer - Interfaces for external dependencies

pub mod measurement_repository;
pub mod speed_test_probe;
pub mod time_provider;

// Re-exports
pub use measurement_repository::MeasurementRepository;
pub use speed_test_probe::{ProbeError, ProbeOutput, SpeedTestProbe};
pub use time_provider::TimeProvider;
