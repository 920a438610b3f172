//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 server for Speedwatch. Transport is plain
//! localhost TCP; any presentation layer that speaks JSON-RPC can bind to it.

pub mod error;
pub mod handler;
pub mod rate_limiter;
pub mod server;
pub mod types;

pub use server::RpcServer;
