//! Call Bridge Core - Shared domain types and service infrastructure
//!
//! This crate provides:
//! - Standard service trait the bridge microservices implement
//! - Call domain types (CallRequest, SessionId)
//! - Tunnel discovery against the local ngrok inspection API
//! - Error handling utilities
//! - Configuration management

pub mod config;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use discovery::{TunnelDiscovery, TunnelPair, TunnelResolution, TunnelResolver};
pub use domain::*;
pub use error::{CallBridgeError, Result};
pub use service::{CallBridgeService, DependencyStatus, HealthStatus, MicroserviceRuntime, ReadinessStatus};
