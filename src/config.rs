// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Consumer endpoint configuration
//!
//! The relay talks to a single listening process over local TCP. The
//! endpoint defaults to `127.0.0.1:1337` and can be overridden per
//! constructor call or through the environment.

use serde::{Deserialize, Serialize};

/// Default consumer host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default consumer port
pub const DEFAULT_PORT: u16 = 1337;

/// Where checkpoint messages are delivered
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl RelayConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Build a config from `CHECKPOINT_RELAY_HOST` / `CHECKPOINT_RELAY_PORT`,
    /// keeping the documented defaults for anything unset or unparseable
    pub fn from_env() -> Self {
        let host = std::env::var("CHECKPOINT_RELAY_HOST")
            .unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = std::env::var("CHECKPOINT_RELAY_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { host, port }
    }

    /// `host:port` form used for the TCP connect
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
