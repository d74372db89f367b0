// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! The classification decision tree
//!
//! Order matters and first match returns:
//! 1. an existing file path (wins over everything, even JSON-parseable text)
//! 2. structured record → canonical JSON
//! 3. archive-capable dataset → always spooled, never inlined
//! 4. raw binary
//! 5. table → CSV text, re-entering the text heuristics
//! 6. text: JSON re-parse → delimiter sniff → plain text
//!
//! Strings that parse as JSON are re-classified as the parsed structure, so
//! `'{"a":1}'` comes out as a record and `'"/etc/hosts"'` gets the file-path
//! test again. That re-entry is depth-capped: past the cap the text is taken
//! at face value instead of unwrapped further.

use crate::archive::{hash_file, SelfSerializingArchive};
use crate::classify::kind::{guess_file_label, ContentKind};
use crate::classify::sniff::sniff_delimiter;
use crate::encode::{encode_for_transport, EncodedPayload, RawPayload, TransportPayload};
use crate::error::RelayError;
use crate::spool::spool_archive;
use crate::value::CheckpointValue;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How many times a nested JSON-encoded string may re-enter classification
const MAX_CLASSIFY_DEPTH: usize = 8;

/// What classification decided about a value
#[derive(Debug)]
pub struct Classification {
    /// Canonical transport form of the payload
    pub payload: TransportPayload,

    /// Inferred category
    pub kind: ContentKind,

    /// MIME-style label for the envelope's `dataType` field
    pub data_type: Option<String>,

    /// Absolute path of a referenced pre-existing file (`FileReference` only)
    pub source_file_path: Option<PathBuf>,

    /// True when the payload was written to a temp file the consumer must
    /// read (and eventually delete) itself
    pub is_spooled: bool,

    /// SHA-256 of a spooled archive file, hex-encoded (`ArchiveBinary` only)
    pub content_hash: Option<String>,
}

impl Classification {
    fn from_encoded(encoded: EncodedPayload, kind: ContentKind) -> Self {
        Self {
            payload: encoded.payload,
            kind,
            data_type: kind.mime_label().map(str::to_string),
            source_file_path: None,
            is_spooled: encoded.is_spooled,
            content_hash: None,
        }
    }

    fn unknown() -> Self {
        Self {
            payload: TransportPayload::Empty,
            kind: ContentKind::Unknown,
            data_type: None,
            source_file_path: None,
            is_spooled: false,
            content_hash: None,
        }
    }
}

/// Classify `value` and produce its canonical transport payload.
///
/// Never fails on content: unrecognizable input degrades to
/// [`ContentKind::Unknown`]. Spool and archive I/O errors propagate because
/// they abort the checkpoint.
pub(crate) fn classify(
    value: CheckpointValue,
    declared_extension: Option<&str>,
) -> Result<Classification, RelayError> {
    classify_at_depth(value, declared_extension, 0)
}

fn classify_at_depth(
    value: CheckpointValue,
    declared_extension: Option<&str>,
    depth: usize,
) -> Result<Classification, RelayError> {
    match value {
        CheckpointValue::Text(text) => {
            if let Some(reference) = try_file_reference(&text) {
                return Ok(reference);
            }
            classify_text_content(text, declared_extension, depth)
        }
        CheckpointValue::Record(record) => {
            // serde_json object maps are key-sorted, so this is canonical
            let json = serde_json::to_string(&record)?;
            let encoded = encode_for_transport(
                RawPayload::Text(json),
                ContentKind::Json.spool_suffix(),
            )?;
            Ok(Classification::from_encoded(encoded, ContentKind::Json))
        }
        CheckpointValue::Archive(archive) => classify_archive(archive.as_ref()),
        CheckpointValue::Bytes(bytes) => {
            let suffix = binary_spool_suffix(declared_extension);
            let encoded = encode_for_transport(RawPayload::Binary(bytes), &suffix)?;
            Ok(Classification::from_encoded(encoded, ContentKind::Binary))
        }
        CheckpointValue::Table(table) => {
            debug!(rows = table.row_count(), "table converted to CSV text");
            classify_text_content(table.to_csv(), declared_extension, depth)
        }
        CheckpointValue::Unknown => {
            warn!("value is unclassifiable, delivering an empty envelope");
            Ok(Classification::unknown())
        }
    }
}

/// Steps 6a-6c: JSON re-parse, delimiter sniff, plain text
fn classify_text_content(
    text: String,
    declared_extension: Option<&str>,
    depth: usize,
) -> Result<Classification, RelayError> {
    if depth < MAX_CLASSIFY_DEPTH {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&text) {
            debug!(depth, "text parses as JSON, re-classifying parsed structure");
            return match parsed {
                serde_json::Value::String(inner) => {
                    classify_at_depth(CheckpointValue::Text(inner), declared_extension, depth + 1)
                }
                structured => classify_at_depth(
                    CheckpointValue::Record(structured),
                    declared_extension,
                    depth + 1,
                ),
            };
        }
    } else {
        warn!(depth, "classification depth cap reached, taking text at face value");
    }

    if let Some(delimiter) = sniff_delimiter(&text) {
        debug!(%delimiter, "text looks like delimited tabular data");
        let encoded =
            encode_for_transport(RawPayload::Text(text), ContentKind::CsvText.spool_suffix())?;
        return Ok(Classification::from_encoded(encoded, ContentKind::CsvText));
    }

    let encoded =
        encode_for_transport(RawPayload::Text(text), ContentKind::PlainText.spool_suffix())?;
    Ok(Classification::from_encoded(encoded, ContentKind::PlainText))
}

/// Step 1: does the string name an existing regular file?
fn try_file_reference(text: &str) -> Option<Classification> {
    if text.is_empty() {
        return None;
    }
    let absolute = std::path::absolute(Path::new(text)).ok()?;
    if !absolute.is_file() {
        return None;
    }

    let label = guess_file_label(&absolute);
    debug!(path = %absolute.display(), %label, "value resolves to an existing file");
    Some(Classification {
        payload: TransportPayload::InlineText(text.to_string()),
        kind: ContentKind::FileReference,
        data_type: Some(label),
        source_file_path: Some(absolute),
        is_spooled: false,
        content_hash: None,
    })
}

/// Step 3: archives are spooled unconditionally and content-hashed.
/// The hash stays off the wire; it is logged and reported to the caller.
fn classify_archive(archive: &dyn SelfSerializingArchive) -> Result<Classification, RelayError> {
    let path = spool_archive(archive)?;
    let content_hash = hash_file(&path).map_err(RelayError::Spool)?;
    debug!(path = %path.display(), hash = %content_hash, "dataset archived");

    Ok(Classification {
        payload: TransportPayload::Spooled(path),
        kind: ContentKind::ArchiveBinary,
        data_type: ContentKind::ArchiveBinary.mime_label().map(str::to_string),
        source_file_path: None,
        is_spooled: true,
        content_hash: Some(content_hash),
    })
}

/// Binary spools honor a declared extension, defaulting to the generic suffix
fn binary_spool_suffix(declared_extension: Option<&str>) -> String {
    match declared_extension {
        Some(ext) if !ext.is_empty() => {
            if ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{}", ext)
            }
        }
        _ => ContentKind::Binary.spool_suffix().to_string(),
    }
}
