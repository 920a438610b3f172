// Application Layer - Use case orchestration

pub mod measurement_service;

pub use measurement_service::MeasurementService;
