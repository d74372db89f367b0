// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Size-based transport encoding
//!
//! Payloads below the inline threshold travel inside the envelope (text
//! as-is, binary as base64 at envelope-build time). Anything at or above
//! the threshold is spooled to a temp file and shipped by reference. The
//! size check runs on the pre-encoding byte length, and the whole payload
//! is materialized in memory first; there is no streamed encoding.

use crate::error::RelayError;
use crate::spool::spool;
use std::path::PathBuf;

/// Payloads at or above this many pre-encoding bytes are spooled
pub const INLINE_THRESHOLD_BYTES: usize = 75 * 1024 * 1024;

/// Transport form of a payload, threaded through envelope assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportPayload {
    /// Inline text, carried verbatim in the envelope's `data` field
    InlineText(String),

    /// Inline binary, base64-encoded when the envelope is built
    InlineBinary(Vec<u8>),

    /// Reference to a spooled file the consumer reads itself
    Spooled(PathBuf),

    /// No payload (archive references and unknown values)
    Empty,
}

/// Pre-encoding payload body handed to the size switch
#[derive(Debug)]
pub(crate) enum RawPayload {
    Text(String),
    Binary(Vec<u8>),
}

impl RawPayload {
    fn byte_len(&self) -> usize {
        match self {
            RawPayload::Text(s) => s.len(),
            RawPayload::Binary(b) => b.len(),
        }
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            RawPayload::Text(s) => s.as_bytes(),
            RawPayload::Binary(b) => b,
        }
    }
}

/// Outcome of the size switch
#[derive(Debug)]
pub(crate) struct EncodedPayload {
    pub payload: TransportPayload,
    pub is_spooled: bool,
}

/// Inline or spool `raw` based on its byte length
pub(crate) fn encode_for_transport(
    raw: RawPayload,
    suffix: &str,
) -> Result<EncodedPayload, RelayError> {
    if raw.byte_len() < INLINE_THRESHOLD_BYTES {
        let payload = match raw {
            RawPayload::Text(s) => TransportPayload::InlineText(s),
            RawPayload::Binary(b) => TransportPayload::InlineBinary(b),
        };
        return Ok(EncodedPayload {
            payload,
            is_spooled: false,
        });
    }

    let path = spool(raw.as_bytes(), suffix)?;
    Ok(EncodedPayload {
        payload: TransportPayload::Spooled(path),
        is_spooled: true,
    })
}
