// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Error types for checkpoint delivery
//!
//! Classification ambiguity is never an error: the classifier recovers by
//! falling through to the next heuristic, and unclassifiable input still
//! produces a deliverable envelope. Everything here is fatal to the call
//! and propagates to the caller of `checkpoint` untouched.

use thiserror::Error;

/// Errors that abort a checkpoint call
#[derive(Error, Debug)]
pub enum RelayError {
    /// Writing an oversized payload to its spool file failed
    #[error("Failed to spool payload to temp file: {0}")]
    Spool(#[source] std::io::Error),

    /// An archive adapter failed to write its self-contained file
    #[error("Failed to write archive file: {0}")]
    Archive(#[source] anyhow::Error),

    /// Connecting to the consumer endpoint failed
    #[error("Failed to connect to checkpoint consumer at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the message failed after the connection was open
    #[error("Failed to write checkpoint message: {0}")]
    Transport(#[source] std::io::Error),

    /// The envelope could not be serialized to JSON
    #[error("Failed to serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl RelayError {
    /// Stable code for logging and metrics
    pub fn error_code(&self) -> &'static str {
        match self {
            RelayError::Spool(_) => "SPOOL_FAILED",
            RelayError::Archive(_) => "ARCHIVE_WRITE_FAILED",
            RelayError::Connect { .. } => "CONNECT_FAILED",
            RelayError::Transport(_) => "TRANSPORT_WRITE_FAILED",
            RelayError::Serialize(_) => "SERIALIZE_FAILED",
        }
    }

    /// True when the failure happened before any bytes reached the transport
    pub fn is_pre_transport(&self) -> bool {
        !matches!(self, RelayError::Transport(_))
    }
}
