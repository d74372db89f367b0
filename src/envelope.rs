// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! The wire envelope
//!
//! Self-describing message handed to the consumer: payload (inline or by
//! reference), its MIME-style label, and the caller's opaque metadata and
//! identifier. Inline binary is base64-encoded here so the whole envelope
//! stays printable text.
//!
//! ## Wire shape
//! All seven keys are always present; absent values are explicit nulls.
//! A file-reference envelope carries both `data` (the original path string)
//! and `localPath` (its absolute form) with `localIsTemp = false`.

use crate::classify::Classification;
use crate::encode::TransportPayload;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// The message ultimately transmitted for one checkpoint call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Inline payload: raw text or base64-encoded binary
    pub data: Option<String>,

    /// Caller-supplied, never inspected
    pub metadata: serde_json::Value,

    /// Caller-supplied, never inspected
    pub identifier: serde_json::Value,

    /// Absolute path the consumer should read when `data` is null
    pub local_path: Option<String>,

    /// True when `localPath` is a spooled temp file the consumer must delete
    pub local_is_temp: bool,

    /// MIME-style label; null only for unclassifiable values
    pub data_type: Option<String>,

    /// The caller's declared extension, passed through verbatim
    pub extension: Option<String>,
}

impl Envelope {
    /// Assemble the envelope from a classified value and the caller's
    /// pass-through fields
    pub(crate) fn from_classification(
        classification: Classification,
        metadata: serde_json::Value,
        identifier: serde_json::Value,
        extension: Option<&str>,
    ) -> Self {
        let (data, spooled_path) = match classification.payload {
            TransportPayload::InlineText(text) => (Some(text), None),
            TransportPayload::InlineBinary(bytes) => (Some(BASE64.encode(bytes)), None),
            TransportPayload::Spooled(path) => (None, Some(path)),
            TransportPayload::Empty => (None, None),
        };

        // Spooled payloads and file references are mutually exclusive
        let local_path = spooled_path
            .or(classification.source_file_path)
            .map(|p| p.display().to_string());

        Self {
            data,
            metadata,
            identifier,
            local_path,
            local_is_temp: classification.is_spooled,
            data_type: classification.data_type,
            extension: extension.map(str::to_string),
        }
    }

    /// Canonical compact JSON for the wire
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
