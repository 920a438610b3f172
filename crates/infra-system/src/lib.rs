// Speedwatch Infrastructure - System Adapters
// Implements: SpeedTestProbe

pub mod speedtest_cli_probe;

pub use speedtest_cli_probe::SpeedtestCliProbe;
