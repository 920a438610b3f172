// Speedwatch Infrastructure - SQLite Adapter
// Implements: MeasurementRepository

mod connection;
mod measurement_repository;
mod migration;

pub use connection::create_pool;
pub use measurement_repository::SqliteMeasurementRepository;
pub use migration::run_migrations;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
