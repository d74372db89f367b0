// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Framing and delivery
//!
//! Wire format: a 10-character left-justified, space-padded ASCII decimal
//! length field, then the UTF-8 JSON envelope, written as one unit. The
//! length counts envelope bytes, so a stream receiver can delimit messages
//! without closing the connection. `send_unframed` exists for receivers of
//! the older unframed dialect and writes the bare envelope.
//!
//! One fresh TCP connection per message: no pooling, no retries, no
//! timeouts. The socket is closed in every path, error or not.

use crate::config::RelayConfig;
use crate::error::RelayError;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

/// Width of the ASCII length field
pub const FRAME_LEN_WIDTH: usize = 10;

/// Writes framed envelopes to the configured consumer endpoint
#[derive(Debug, Clone)]
pub struct FramedSender {
    config: RelayConfig,
}

impl FramedSender {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Prefix `message` with its fixed-width byte length
    pub(crate) fn frame(message: &str) -> Vec<u8> {
        let mut framed =
            format!("{:<width$}", message.len(), width = FRAME_LEN_WIDTH).into_bytes();
        framed.extend_from_slice(message.as_bytes());
        framed
    }

    /// Deliver one framed message over a fresh connection
    pub async fn send(&self, message: &str) -> Result<(), RelayError> {
        self.write_to_endpoint(&Self::frame(message)).await
    }

    /// Deliver the bare envelope without a length prefix (older dialect)
    pub async fn send_unframed(&self, message: &str) -> Result<(), RelayError> {
        self.write_to_endpoint(message.as_bytes()).await
    }

    async fn write_to_endpoint(&self, bytes: &[u8]) -> Result<(), RelayError> {
        let endpoint = self.config.endpoint();
        let mut stream =
            TcpStream::connect(&endpoint)
                .await
                .map_err(|source| RelayError::Connect {
                    endpoint: endpoint.clone(),
                    source,
                })?;

        // The stream drops (and closes) on the error path too
        stream
            .write_all(bytes)
            .await
            .map_err(RelayError::Transport)?;
        stream.shutdown().await.map_err(RelayError::Transport)?;

        debug!(%endpoint, bytes = bytes.len(), "message written");
        Ok(())
    }
}
