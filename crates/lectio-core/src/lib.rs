//! Shared service plumbing for Lectio binaries: error responses, health
//! probes, request ids, tracing setup and env-based configuration.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
