// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Checkpoint Relay entry point
//!
//! Producers hand off checkpoints (data + metadata + an identifier) to a
//! separate consumer process listening on local TCP. The relay classifies
//! the value, picks its transport form, and delivers one self-describing
//! envelope per call.
//!
//! ## Usage
//! ```ignore
//! let relay = CheckpointRelay::default();
//! relay
//!     .checkpoint("hello world", json!({"stage": "preprocess"}), json!("run-42"), None)
//!     .await?;
//! ```
//!
//! Each call is sequential on the caller's task: classify, encode, spool if
//! oversized, connect, write, close. Nothing is shared across calls, so
//! concurrent producers are safe with respect to each other. A slow
//! consumer blocks the call; there is no timeout, retry, or acknowledgment.

use crate::classify::{classify, ContentKind};
use crate::config::RelayConfig;
use crate::encode::TransportPayload;
use crate::envelope::Envelope;
use crate::error::RelayError;
use crate::sender::FramedSender;
use crate::value::CheckpointValue;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a delivered checkpoint ended up as.
///
/// Reporting only; nothing here changes the wire format. `content_hash`
/// is populated for archive payloads so producers that track integrity get
/// the digest without a wire change.
#[derive(Debug, Clone)]
pub struct CheckpointReceipt {
    /// Inferred category of the value
    pub kind: ContentKind,

    /// MIME-style label that went on the wire
    pub data_type: Option<String>,

    /// Spooled temp file or referenced source file, when not inlined
    pub local_path: Option<PathBuf>,

    /// True when `local_path` is a temp file the consumer must delete
    pub local_is_temp: bool,

    /// SHA-256 of a spooled archive file
    pub content_hash: Option<String>,

    /// Framed message size in bytes
    pub wire_bytes: usize,
}

/// Client-side transport encoder for checkpoint hand-off
#[derive(Debug, Clone)]
pub struct CheckpointRelay {
    sender: FramedSender,
}

impl Default for CheckpointRelay {
    fn default() -> Self {
        Self::new(RelayConfig::default())
    }
}

impl CheckpointRelay {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            sender: FramedSender::new(config),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        self.sender.config()
    }

    /// Classify `value`, encode it, and deliver one envelope to the
    /// consumer endpoint.
    ///
    /// `metadata` and `identifier` are opaque pass-through fields; the
    /// optional `extension` is carried on the envelope verbatim and, for
    /// raw binary, tags the spool file.
    ///
    /// Payloads at or above the inline threshold (and archive datasets of
    /// any size) are left on disk for the consumer; their cleanup is the
    /// consumer's job, not ours.
    pub async fn checkpoint(
        &self,
        value: impl Into<CheckpointValue>,
        metadata: serde_json::Value,
        identifier: serde_json::Value,
        extension: Option<&str>,
    ) -> Result<CheckpointReceipt, RelayError> {
        let classification = classify(value.into(), extension)?;
        debug!(
            kind = ?classification.kind,
            spooled = classification.is_spooled,
            "checkpoint value classified"
        );

        let kind = classification.kind;
        let data_type = classification.data_type.clone();
        let content_hash = classification.content_hash.clone();
        let local_is_temp = classification.is_spooled;
        let local_path = match &classification.payload {
            TransportPayload::Spooled(path) => Some(path.clone()),
            _ => classification.source_file_path.clone(),
        };

        let envelope = Envelope::from_classification(classification, metadata, identifier, extension);
        let message = envelope.to_json()?;
        self.sender.send(&message).await?;

        info!(
            kind = ?kind,
            bytes = message.len(),
            endpoint = %self.config().endpoint(),
            "checkpoint delivered"
        );

        Ok(CheckpointReceipt {
            kind,
            data_type,
            local_path,
            local_is_temp,
            content_hash,
            wire_bytes: crate::sender::FRAME_LEN_WIDTH + message.len(),
        })
    }
}
