// Speed Test Probe Port
// Abstraction over the external measurement utility subprocess

use async_trait::async_trait;
use thiserror::Error;

/// Captured output of one utility invocation that reached process exit.
///
/// Both streams are fully drained before this value exists, so `stdout` and
/// `stderr` are complete.
#[derive(Debug, Clone)]
pub struct ProbeOutput {
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProbeOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Failures that prevent obtaining a ProbeOutput at all
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("spawn failed: {0}")]
    SpawnFailed(String),

    #[error("probe timed out after {0}ms")]
    Timeout(u64),

    #[error("io error: {0}")]
    Io(String),
}

/// Speed Test Probe trait
///
/// Implementations:
/// - SpeedtestCliProbe: spawns the external `speedtest-cli` process
/// - mocks::MockProbe: scripted behavior for tests
#[async_trait]
pub trait SpeedTestProbe: Send + Sync {
    /// Run one measurement and return the captured output.
    ///
    /// A non-zero exit is NOT an error at this level: the caller decides what
    /// an exit code means. Errors are reserved for invocations that produce
    /// no output at all.
    ///
    /// # Errors
    /// - ProbeError::SpawnFailed if the process cannot be started
    /// - ProbeError::Timeout if execution exceeds the configured bound
    /// - ProbeError::Io if draining or waiting fails
    async fn run(&self) -> Result<ProbeOutput, ProbeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock probe behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit 0 with the given stdout
        Output(String),
        /// Exit non-zero with the given code and stderr
        ExitWith(i32, String),
        /// Spawn failure with message
        SpawnFail(String),
        /// Timeout after N ms
        Timeout(u64),
    }

    /// Mock Speed Test Probe for testing
    pub struct MockProbe {
        behavior: Arc<Mutex<MockBehavior>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockProbe {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn with_output(stdout: impl Into<String>) -> Self {
            Self::new(MockBehavior::Output(stdout.into()))
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl SpeedTestProbe for MockProbe {
        async fn run(&self) -> Result<ProbeOutput, ProbeError> {
            *self.call_count.lock().unwrap() += 1;

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Output(stdout) => Ok(ProbeOutput {
                    exit_code: Some(0),
                    stdout,
                    stderr: String::new(),
                }),
                MockBehavior::ExitWith(code, stderr) => Ok(ProbeOutput {
                    exit_code: Some(code),
                    stdout: String::new(),
                    stderr,
                }),
                MockBehavior::SpawnFail(msg) => Err(ProbeError::SpawnFailed(msg)),
                MockBehavior::Timeout(ms) => Err(ProbeError::Timeout(ms)),
            }
        }
    }
}
