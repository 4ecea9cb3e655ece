//! Shared types for the receptor HTTP server.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_RECEPTOR_ADDR: &str = "0.0.0.0:8887";

/// Configuration for the receptor HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptorConfig {
    pub addr: SocketAddr,
}

impl Default for ReceptorConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8887)),
        }
    }
}

impl ReceptorConfig {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.addr
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}
