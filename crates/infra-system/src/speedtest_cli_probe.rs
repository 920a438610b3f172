// Speedtest CLI probe
//
// Spawns the external measurement utility and captures its output. The
// command and argument list are fixed; only the execution time bound is
// configurable.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{info, warn};

use speedwatch_core::port::{ProbeError, ProbeOutput, SpeedTestProbe};

// Machine-readable summary mode: three fixed lines (Ping, Download, Upload)
const SPEEDTEST_COMMAND: &str = "speedtest-cli";
const SPEEDTEST_ARGS: &[&str] = &["--simple"];

/// The utility can hang indefinitely on a stalled network, so execution is
/// always bounded.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(120);

pub struct SpeedtestCliProbe {
    timeout: Duration,
}

impl SpeedtestCliProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn run_command(&self, command: &str, args: &[&str]) -> Result<ProbeOutput, ProbeError> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProbeError::SpawnFailed(e.to_string()))?;

        // Drain both streams concurrently with process execution. Reading
        // only after exit risks the child blocking on a full pipe buffer.
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProbeError::Io("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ProbeError::Io("stderr was not captured".to_string()))?;

        let stdout_task = tokio::spawn(drain(stdout));
        let stderr_task = tokio::spawn(drain(stderr));

        let status = match timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => return Err(ProbeError::Io(e.to_string())),
            Err(_) => {
                // kill() also reaps the child
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill timed-out subprocess");
                }
                stdout_task.abort();
                stderr_task.abort();
                return Err(ProbeError::Timeout(self.timeout.as_millis() as u64));
            }
        };

        // Streams reach EOF once the child has exited; join after wait
        let stdout = join_drained(stdout_task).await?;
        let stderr = join_drained(stderr_task).await?;

        Ok(ProbeOutput {
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }
}

#[async_trait]
impl SpeedTestProbe for SpeedtestCliProbe {
    async fn run(&self) -> Result<ProbeOutput, ProbeError> {
        info!(
            command = SPEEDTEST_COMMAND,
            args = ?SPEEDTEST_ARGS,
            timeout_ms = self.timeout.as_millis() as u64,
            "Starting measurement subprocess"
        );

        let output = self.run_command(SPEEDTEST_COMMAND, SPEEDTEST_ARGS).await?;

        info!(
            exit_code = ?output.exit_code,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Measurement subprocess completed"
        );

        Ok(output)
    }
}

async fn drain<R>(mut stream: R) -> std::io::Result<Vec<u8>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(buf)
}

async fn join_drained(task: JoinHandle<std::io::Result<Vec<u8>>>) -> Result<String, ProbeError> {
    let bytes = task
        .await
        .map_err(|e| ProbeError::Io(e.to_string()))?
        .map_err(|e| ProbeError::Io(e.to_string()))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
