//! JSON-RPC Server
//!
//! Implements the JSON-RPC 2.0 server over localhost TCP.

use std::sync::Arc;

use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use speedwatch_core::application::MeasurementService;
use tracing::info;

use crate::handler::RpcHandler;

// Localhost only: the presentation layer runs on the same host and nothing
// here is meant to be reachable externally
const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9530;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<MeasurementService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP (localhost only)"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        // Register methods. Neither takes parameters.
        let handler = self.handler.clone();
        module
            .register_async_method("speedtest.run.v1", move |_params, _, _| {
                let handler = handler.clone();
                async move { handler.run_speed_test().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("speedtest.history.v1", move |_params, _, _| {
                let handler = handler.clone();
                async move { handler.history().await }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
