// Domain Layer - Pure business logic and entities

pub mod measurement;
pub mod parser;

// Re-exports
pub use measurement::{MeasurementRecord, MeasurementResult, RecordId};
pub use parser::{parse_summary, ParseError};
